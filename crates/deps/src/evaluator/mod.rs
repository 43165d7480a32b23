//! Dependency tree evaluation.
//!
//! One function per node kind serves both entry points: [`Mode::Verdict`]
//! only computes the boolean, [`Mode::Trace`] additionally builds the
//! [`QueryResult`] for the same walk. Because both modes take the same
//! branches and the same short-circuits, a query can never disagree with
//! the plain answer.

mod leaves;
mod operators;


use wfm_core::CollaboratorError;

use crate::context::EvaluationContext;
use crate::node::DependencyNode;
use crate::query::QueryResult;

use operators::Operator;

/// What the caller wants back from a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Verdict,
    Trace,
}

/// Result of evaluating one node. `report` is present only in trace mode.
#[derive(Debug)]
pub(crate) struct Evaluation {
    pub resolved: bool,
    pub report: Option<QueryResult>,
}

impl Evaluation {
    /// Build a leaf result; the label and message closures only run when tracing.
    pub(crate) fn leaf(
        mode: Mode,
        node: &DependencyNode,
        resolved: bool,
        message: impl FnOnce() -> String,
    ) -> Self {
        let report = match mode {
            Mode::Verdict => None,
            Mode::Trace => Some(QueryResult::new(node.label(), message(), resolved)),
        };
        Self { resolved, report }
    }
}

pub(crate) fn evaluate(
    node: &DependencyNode,
    ctx: &EvaluationContext<'_>,
    mode: Mode,
) -> Result<Evaluation, CollaboratorError> {
    match node {
        DependencyNode::Not { operand } => operators::negate(node, operand, ctx, mode),
        DependencyNode::And { operands } => {
            operators::combine(node, Operator::And, operands, ctx, mode)
        }
        DependencyNode::Or { operands } => {
            operators::combine(node, Operator::Or, operands, ctx, mode)
        }
        DependencyNode::Nand { operands } => {
            operators::combine(node, Operator::Nand, operands, ctx, mode)
        }
        DependencyNode::Nor { operands } => {
            operators::combine(node, Operator::Nor, operands, ctx, mode)
        }
        DependencyNode::Xor { operands } => {
            operators::combine(node, Operator::Xor, operands, ctx, mode)
        }
        DependencyNode::Threshold {
            threshold,
            operands,
        } => operators::combine(node, Operator::AtLeast(*threshold), operands, ctx, mode),
        DependencyNode::TaskState {
            task,
            state,
            cycle_offset,
        } => leaves::task_state(node, task, state, *cycle_offset, ctx, mode),
        DependencyNode::CycleExists { cycle_offset } => {
            Ok(leaves::cycle_exists(node, *cycle_offset, ctx, mode))
        }
        DependencyNode::Data {
            path,
            age,
            min_size,
        } => Ok(leaves::data(node, path, *age, *min_size, ctx, mode)),
        DependencyNode::Time { time } => Ok(leaves::time(node, time, ctx, mode)),
        DependencyNode::Compare {
            left,
            right,
            comparator,
        } => Ok(leaves::compare(node, left, right, *comparator, ctx, mode)),
        DependencyNode::Const { value } => Ok(Evaluation::leaf(mode, node, *value, || {
            "fixed value".to_string()
        })),
    }
}

impl DependencyNode {
    /// Whether this subtree is satisfied. Collaborator failures propagate;
    /// [`Dependency`](crate::Dependency) absorbs them at the root.
    pub fn resolved(&self, ctx: &EvaluationContext<'_>) -> Result<bool, CollaboratorError> {
        evaluate(self, ctx, Mode::Verdict).map(|e| e.resolved)
    }

    /// Diagnostic trace of the same evaluation as [`DependencyNode::resolved`].
    pub fn query(&self, ctx: &EvaluationContext<'_>) -> Result<QueryResult, CollaboratorError> {
        evaluate(self, ctx, Mode::Trace).map(|e| {
            let resolved = e.resolved;
            e.report
                .unwrap_or_else(|| QueryResult::new(self.label(), String::new(), resolved))
        })
    }
}
