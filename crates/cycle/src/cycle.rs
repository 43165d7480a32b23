//! Closed set of cycle definitions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wfm_core::time::format_stamp;

use crate::cron::CronCycle;
use crate::interval::IntervalCycle;
use crate::spec::{CycleSpec, Occurrence};

/// Either kind of cycle definition, as held in a workflow's active list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cycle {
    Cron(CronCycle),
    Interval(IntervalCycle),
}

impl Cycle {
    /// Cursor used by iteration helpers; never read by the search methods.
    pub fn position(&self) -> Option<DateTime<Utc>> {
        match self {
            Cycle::Cron(c) => c.position(),
            Cycle::Interval(c) => c.position(),
        }
    }

    pub fn set_position(&mut self, position: Option<DateTime<Utc>>) {
        match self {
            Cycle::Cron(c) => c.set_position(position),
            Cycle::Interval(c) => c.set_position(position),
        }
    }

    /// Move the cursor to the next occurrence after it (or to the first
    /// occurrence when unset) and return that occurrence.
    ///
    /// The cursor is left untouched once the cycle is exhausted.
    pub fn advance(&mut self) -> Option<Occurrence> {
        let found = match self.position() {
            Some(at) => self.next(at.checked_add_signed(Duration::seconds(1))?, false),
            None => self.first(),
        }?;
        debug!(group = self.group(), cycle = %format_stamp(found.cycle), "cycle advanced");
        self.set_position(Some(found.cycle));
        Some(found)
    }
}

impl From<CronCycle> for Cycle {
    fn from(c: CronCycle) -> Self {
        Cycle::Cron(c)
    }
}

impl From<IntervalCycle> for Cycle {
    fn from(c: IntervalCycle) -> Self {
        Cycle::Interval(c)
    }
}

impl CycleSpec for Cycle {
    fn group(&self) -> &str {
        match self {
            Cycle::Cron(c) => c.group(),
            Cycle::Interval(c) => c.group(),
        }
    }

    fn activation_offset(&self) -> Duration {
        match self {
            Cycle::Cron(c) => c.activation_offset(),
            Cycle::Interval(c) => c.activation_offset(),
        }
    }

    fn next_occurrence(&self, reftime: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Cycle::Cron(c) => c.next_occurrence(reftime),
            Cycle::Interval(c) => c.next_occurrence(reftime),
        }
    }

    fn previous_occurrence(&self, reftime: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Cycle::Cron(c) => c.previous_occurrence(reftime),
            Cycle::Interval(c) => c.previous_occurrence(reftime),
        }
    }

    fn contains(&self, t: DateTime<Utc>) -> bool {
        match self {
            Cycle::Cron(c) => c.contains(t),
            Cycle::Interval(c) => c.contains(t),
        }
    }
}

/// Whether any cycle in `cycles` has an occurrence at `t`.
pub fn any_contains(cycles: &[Cycle], t: DateTime<Utc>) -> bool {
    cycles.iter().any(|c| c.contains(t))
}
