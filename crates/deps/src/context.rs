//! Evaluation context and the collaborator interfaces it carries.
//!
//! The evaluator only reads through these traits. Implementations must be
//! safe to share across threads; retries and timeouts are theirs to handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wfm_core::CollaboratorError;
use wfm_cycle::Cycle;

use crate::render::PassThrough;

/// The latest known job for one task and cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub state: String,
    #[serde(default)]
    pub exit_status: Option<i32>,
    #[serde(default)]
    pub tries: u32,
}

impl JobRecord {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            exit_status: None,
            tries: 0,
        }
    }

    pub fn with_exit_status(mut self, exit_status: i32) -> Self {
        self.exit_status = Some(exit_status);
        self
    }

    pub fn with_tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    /// Whether `state` names this record's state, ignoring case.
    pub fn is_in_state(&self, state: &str) -> bool {
        self.state.eq_ignore_ascii_case(state)
    }

    /// The job has finished, successfully or not.
    pub fn is_done(&self) -> bool {
        self.is_in_state("done")
    }

    /// The job finished with exit status zero.
    pub fn is_done_okay(&self) -> bool {
        self.is_done() && self.exit_status == Some(0)
    }

    /// The job finished with a non-zero exit status.
    pub fn is_crashed(&self) -> bool {
        self.is_done() && self.exit_status.is_some_and(|code| code != 0)
    }
}

/// Read-only job facts: task name and cycle to the latest job record.
pub trait JobLookup: Send + Sync {
    fn get(&self, task: &str, cycle: DateTime<Utc>) -> Result<Option<JobRecord>, CollaboratorError>;
}

/// File-system facts for data dependencies. Any call may fail transiently.
pub trait IoProbe: Send + Sync {
    fn exists(&self, path: &str) -> Result<bool, CollaboratorError>;
    fn size(&self, path: &str) -> Result<u64, CollaboratorError>;
    fn mtime(&self, path: &str) -> Result<DateTime<Utc>, CollaboratorError>;
}

/// Expands a path or time template for a cycle.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, cycle: DateTime<Utc>) -> String;
}

impl<F> TemplateRenderer for F
where
    F: Fn(&str, DateTime<Utc>) -> String + Send + Sync,
{
    fn render(&self, template: &str, cycle: DateTime<Utc>) -> String {
        self(template, cycle)
    }
}

/// Everything a dependency tree is evaluated against.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// The cycle being considered.
    pub cycle: DateTime<Utc>,
    /// Wall-clock instant used by time and data-age checks.
    pub now: DateTime<Utc>,
    pub jobs: &'a dyn JobLookup,
    /// Active cycle definitions consulted by cycle-exists leaves.
    pub cycles: &'a [Cycle],
    pub probe: &'a dyn IoProbe,
    pub renderer: &'a dyn TemplateRenderer,
}

impl<'a> EvaluationContext<'a> {
    /// Context at the current wall-clock time with pre-rendered templates.
    pub fn new(
        cycle: DateTime<Utc>,
        jobs: &'a dyn JobLookup,
        cycles: &'a [Cycle],
        probe: &'a dyn IoProbe,
    ) -> Self {
        Self {
            cycle,
            now: Utc::now(),
            jobs,
            cycles,
            probe,
            renderer: &PassThrough,
        }
    }

    /// Evaluate as if the wall clock read `now`.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_renderer(mut self, renderer: &'a dyn TemplateRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub(crate) fn render(&self, template: &str) -> String {
        self.renderer.render(template, self.cycle)
    }
}

impl std::fmt::Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("cycle", &self.cycle)
            .field("now", &self.now)
            .field("cycles", &self.cycles.len())
            .finish_non_exhaustive()
    }
}
