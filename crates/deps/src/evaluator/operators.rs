//! Operator nodes: negation and the short-circuiting combinators.

use wfm_core::CollaboratorError;

use crate::context::EvaluationContext;
use crate::node::DependencyNode;
use crate::query::QueryResult;

use super::{evaluate, Evaluation, Mode};

/// Combinators over an operand list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Operator {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    /// Resolved once `resolved / total >= threshold`.
    AtLeast(f64),
}

fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        count as f64 / total as f64
    }
}

impl Operator {
    /// The answer once it can no longer change, given the tallies after at
    /// least one evaluated operand.
    fn decide(self, hits: usize, misses: usize, total: usize) -> Option<bool> {
        match self {
            Operator::And if misses > 0 => Some(false),
            Operator::Or if hits > 0 => Some(true),
            Operator::Nand if misses > 0 => Some(true),
            Operator::Nor if hits > 0 => Some(false),
            Operator::Xor if hits > 1 => Some(false),
            Operator::AtLeast(threshold) if fraction(hits, total) >= threshold => Some(true),
            _ => None,
        }
    }

    /// The answer after every operand was evaluated without a decision.
    fn settle(self, hits: usize, total: usize) -> bool {
        match self {
            Operator::And | Operator::Nor => true,
            Operator::Or | Operator::Nand => false,
            Operator::Xor => hits == 1,
            Operator::AtLeast(threshold) => fraction(hits, total) >= threshold,
        }
    }
}

pub(super) fn negate(
    node: &DependencyNode,
    operand: &DependencyNode,
    ctx: &EvaluationContext<'_>,
    mode: Mode,
) -> Result<Evaluation, CollaboratorError> {
    let inner = evaluate(operand, ctx, mode)?;
    let resolved = !inner.resolved;
    let report = inner.report.map(|child| {
        let message = if resolved {
            "operand not satisfied"
        } else {
            "operand satisfied"
        };
        QueryResult::new(node.label(), message, resolved).with_children(vec![child])
    });
    Ok(Evaluation { resolved, report })
}

pub(super) fn combine(
    node: &DependencyNode,
    operator: Operator,
    operands: &[DependencyNode],
    ctx: &EvaluationContext<'_>,
    mode: Mode,
) -> Result<Evaluation, CollaboratorError> {
    let total = operands.len();
    let mut hits = 0;
    let mut misses = 0;
    let mut children = Vec::new();

    let mut decision = None;
    for operand in operands {
        let eval = evaluate(operand, ctx, mode)?;
        if eval.resolved {
            hits += 1;
        } else {
            misses += 1;
        }
        children.extend(eval.report);
        decision = operator.decide(hits, misses, total);
        if decision.is_some() {
            break;
        }
    }

    let resolved = decision.unwrap_or_else(|| operator.settle(hits, total));
    let report = match mode {
        Mode::Verdict => None,
        Mode::Trace => {
            let evaluated = hits + misses;
            let mut message = format!("{hits} of {evaluated} evaluated operand(s) satisfied");
            if evaluated < total {
                message.push_str(&format!(", stopped early ({total} total)"));
            }
            Some(QueryResult::new(node.label(), message, resolved).with_children(children))
        }
    };

    Ok(Evaluation { resolved, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn some_decides_only_once_threshold_is_reached() {
        let op = Operator::AtLeast(0.5);
        assert_eq!(op.decide(0, 1, 4), None);
        assert_eq!(op.decide(1, 1, 4), None);
        assert_eq!(op.decide(2, 0, 4), Some(true));
        assert_eq!(op.decide(0, 3, 4), None);
        assert_eq!(op.decide(1, 3, 4), None);
        assert!(!op.settle(1, 4));
        assert!(op.settle(2, 4));
    }

    #[test]
    fn some_with_zero_threshold_is_met_by_the_first_operand() {
        assert_eq!(Operator::AtLeast(0.0).decide(0, 1, 3), Some(true));
        assert_eq!(Operator::AtLeast(0.0).decide(1, 0, 3), Some(true));
    }

    #[test]
    fn full_threshold_waits_for_every_operand() {
        let op = Operator::AtLeast(1.0);
        assert_eq!(op.decide(1, 0, 3), None);
        assert_eq!(op.decide(0, 1, 3), None);
        assert_eq!(op.decide(2, 1, 3), None);
        assert_eq!(op.decide(3, 0, 3), Some(true));
        assert!(!op.settle(2, 3));
    }

    #[test]
    fn xor_waits_for_a_second_hit() {
        assert_eq!(Operator::Xor.decide(1, 0, 3), None);
        assert_eq!(Operator::Xor.decide(2, 0, 3), Some(false));
        assert!(Operator::Xor.settle(1, 3));
        assert!(!Operator::Xor.settle(0, 3));
    }
}
