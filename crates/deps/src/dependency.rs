//! The root of a task's dependency tree.

use serde::{Deserialize, Serialize};
use tracing::warn;
use wfm_core::time::format_stamp;
use wfm_core::{ConfigError, Result};

use crate::context::EvaluationContext;
use crate::node::DependencyNode;
use crate::query::QueryResult;

/// A validated dependency tree.
///
/// This is the one place where collaborator failures are absorbed: any error
/// escaping the tree is logged and reported as "not resolved".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DependencyNode", into = "DependencyNode")]
pub struct Dependency {
    root: DependencyNode,
}

impl Dependency {
    /// Validate and normalize `root`; invalid trees are rejected.
    pub fn new(root: DependencyNode) -> Result<Self> {
        Ok(Self {
            root: root.validated()?,
        })
    }

    pub fn root(&self) -> &DependencyNode {
        &self.root
    }

    /// Whether the task may run for `ctx.cycle`.
    pub fn resolved(&self, ctx: &EvaluationContext<'_>) -> bool {
        match self.root.resolved(ctx) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(
                    cycle = %format_stamp(ctx.cycle),
                    error = %e,
                    "dependency evaluation failed, treating as unresolved"
                );
                false
            }
        }
    }

    /// Diagnostic trace agreeing with [`Dependency::resolved`].
    pub fn query(&self, ctx: &EvaluationContext<'_>) -> QueryResult {
        match self.root.query(ctx) {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    cycle = %format_stamp(ctx.cycle),
                    error = %e,
                    "dependency query failed, treating as unresolved"
                );
                QueryResult::new(self.root.label(), format!("could not be evaluated: {e}"), false)
            }
        }
    }
}

impl TryFrom<DependencyNode> for Dependency {
    type Error = ConfigError;

    fn try_from(root: DependencyNode) -> Result<Self> {
        Self::new(root)
    }
}

impl From<Dependency> for DependencyNode {
    fn from(dependency: Dependency) -> Self {
        dependency.root
    }
}
