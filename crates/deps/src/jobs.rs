//! In-memory job facts.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use wfm_core::CollaboratorError;

use crate::context::{JobLookup, JobRecord};

/// Sort order for [`JobTable::records`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobOrder {
    /// Task name, then cycle.
    #[default]
    ByTask,
    /// Cycle, then task name.
    ByCycle,
}

/// A job listing entry.
pub type JobEntry<'a> = (&'a str, DateTime<Utc>, &'a JobRecord);

impl JobOrder {
    fn compare(self, a: &JobEntry<'_>, b: &JobEntry<'_>) -> Ordering {
        match self {
            JobOrder::ByTask => a.0.cmp(b.0).then(a.1.cmp(&b.1)),
            JobOrder::ByCycle => a.1.cmp(&b.1).then(a.0.cmp(b.0)),
        }
    }
}

/// Job records keyed by task name and cycle.
#[derive(Debug, Clone, Default)]
pub struct JobTable {
    jobs: BTreeMap<String, BTreeMap<DateTime<Utc>, JobRecord>>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `(task, cycle)`.
    pub fn insert(&mut self, task: impl Into<String>, cycle: DateTime<Utc>, record: JobRecord) {
        self.jobs.entry(task.into()).or_default().insert(cycle, record);
    }

    pub fn get(&self, task: &str, cycle: DateTime<Utc>) -> Option<&JobRecord> {
        self.jobs.get(task).and_then(|by_cycle| by_cycle.get(&cycle))
    }

    /// Every record, sorted by `order`.
    pub fn records(&self, order: JobOrder) -> Vec<JobEntry<'_>> {
        let mut out: Vec<JobEntry<'_>> = self
            .jobs
            .iter()
            .flat_map(|(task, by_cycle)| {
                by_cycle
                    .iter()
                    .map(move |(cycle, record)| (task.as_str(), *cycle, record))
            })
            .collect();
        out.sort_by(|a, b| order.compare(a, b));
        out
    }

    pub fn len(&self) -> usize {
        self.jobs.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobLookup for JobTable {
    fn get(&self, task: &str, cycle: DateTime<Utc>) -> Result<Option<JobRecord>, CollaboratorError> {
        Ok(JobTable::get(self, task, cycle).cloned())
    }
}
