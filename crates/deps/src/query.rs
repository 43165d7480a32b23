//! Diagnostic projection of a dependency evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a dependency (sub)tree did or did not resolve.
///
/// `resolved` at every node equals the boolean evaluation of that subtree.
/// Operators only list the children evaluated before they short-circuited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub label: String,
    pub message: String,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<QueryResult>,
}

impl QueryResult {
    pub fn new(label: impl Into<String>, message: impl Into<String>, resolved: bool) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
            resolved,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<QueryResult>) -> Self {
        self.children = children;
        self
    }

    /// Depth-first walk over this node and its descendants.
    pub fn walk(&self) -> Vec<&QueryResult> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let mark = if self.resolved { "+" } else { "-" };
        writeln!(f, "{:indent$}[{mark}] {}: {}", "", self.label, self.message, indent = depth * 2)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
