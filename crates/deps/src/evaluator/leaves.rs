//! Leaf predicates.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use wfm_core::time::{format_duration, format_stamp, parse_stamp};
use wfm_core::CollaboratorError;
use wfm_cycle::any_contains;

use crate::context::EvaluationContext;
use crate::node::{Comparator, DependencyNode};

use super::{Evaluation, Mode};

fn offset_cycle(ctx: &EvaluationContext<'_>, offset: Duration) -> Option<DateTime<Utc>> {
    ctx.cycle.checked_add_signed(offset)
}

pub(super) fn task_state(
    node: &DependencyNode,
    task: &str,
    state: &str,
    offset: Duration,
    ctx: &EvaluationContext<'_>,
    mode: Mode,
) -> Result<Evaluation, CollaboratorError> {
    let Some(cycle) = offset_cycle(ctx, offset) else {
        return Ok(Evaluation::leaf(mode, node, false, || {
            "cycle offset out of range".to_string()
        }));
    };

    let record = ctx.jobs.get(task, cycle)?;
    let resolved = record.as_ref().is_some_and(|r| r.is_in_state(state));
    debug!(task, state, cycle = %format_stamp(cycle), resolved, "task dependency");

    Ok(Evaluation::leaf(mode, node, resolved, || match &record {
        None => format!("no job for cycle {}", format_stamp(cycle)),
        Some(r) => format!("job for cycle {} is {}", format_stamp(cycle), r.state),
    }))
}

pub(super) fn cycle_exists(
    node: &DependencyNode,
    offset: Duration,
    ctx: &EvaluationContext<'_>,
    mode: Mode,
) -> Evaluation {
    let target = offset_cycle(ctx, offset);
    let resolved = target.is_some_and(|t| any_contains(ctx.cycles, t));
    debug!(resolved, "cycle-exists dependency");

    Evaluation::leaf(mode, node, resolved, || match target {
        Some(t) if resolved => format!("cycle {} is defined", format_stamp(t)),
        Some(t) => format!("cycle {} is not defined", format_stamp(t)),
        None => "cycle offset out of range".to_string(),
    })
}

/// Why a data dependency is or is not yet satisfied.
enum DataStatus {
    Ready,
    Missing,
    TooSmall(u64),
    TooYoung(Duration),
    Unavailable(String),
}

fn probe_data(
    ctx: &EvaluationContext<'_>,
    path: &str,
    age: Duration,
    min_size: u64,
) -> Result<DataStatus, CollaboratorError> {
    if !ctx.probe.exists(path)? {
        return Ok(DataStatus::Missing);
    }
    let size = ctx.probe.size(path)?;
    if size < min_size {
        return Ok(DataStatus::TooSmall(size));
    }
    let current_age = ctx.now - ctx.probe.mtime(path)?;
    if current_age < age {
        return Ok(DataStatus::TooYoung(current_age));
    }
    Ok(DataStatus::Ready)
}

/// Probe failures never escape: they leave the dependency unresolved.
pub(super) fn data(
    node: &DependencyNode,
    template: &str,
    age: Duration,
    min_size: u64,
    ctx: &EvaluationContext<'_>,
    mode: Mode,
) -> Evaluation {
    let path = ctx.render(template);
    let status = probe_data(ctx, &path, age, min_size).unwrap_or_else(|e| {
        debug!(path = %path, error = %e, "data probe failed, treating as unresolved");
        DataStatus::Unavailable(e.to_string())
    });
    let resolved = matches!(status, DataStatus::Ready);
    debug!(path = %path, resolved, "data dependency");

    Evaluation::leaf(mode, node, resolved, || match status {
        DataStatus::Ready => format!("{path} is available"),
        DataStatus::Missing => format!("{path} does not exist"),
        DataStatus::TooSmall(size) => format!("{path} is {size} bytes, needs {min_size}"),
        DataStatus::TooYoung(current) => format!(
            "{path} is {} old, needs {}",
            format_duration(current),
            format_duration(age)
        ),
        DataStatus::Unavailable(reason) => format!("{path} could not be checked: {reason}"),
    })
}

pub(super) fn time(
    node: &DependencyNode,
    template: &str,
    ctx: &EvaluationContext<'_>,
    mode: Mode,
) -> Evaluation {
    let rendered = ctx.render(template);
    match parse_stamp(&rendered) {
        Ok(at) => {
            let resolved = ctx.now > at;
            debug!(time = %rendered, resolved, "time dependency");
            Evaluation::leaf(mode, node, resolved, || {
                if resolved {
                    format!("{rendered} has passed")
                } else {
                    format!("waiting until {rendered}")
                }
            })
        }
        Err(e) => {
            tracing::warn!(time = %rendered, error = %e, "time dependency is not a valid stamp");
            Evaluation::leaf(mode, node, false, || e.to_string())
        }
    }
}

pub(super) fn compare(
    node: &DependencyNode,
    left: &str,
    right: &str,
    comparator: Comparator,
    ctx: &EvaluationContext<'_>,
    mode: Mode,
) -> Evaluation {
    let left = ctx.render(left);
    let right = ctx.render(right);
    let resolved = match comparator {
        Comparator::Eq => left == right,
        Comparator::Ne => left != right,
    };

    Evaluation::leaf(mode, node, resolved, || format!("'{left}' vs '{right}'"))
}
