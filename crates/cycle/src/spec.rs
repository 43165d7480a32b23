//! The capability shared by every cycle definition.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use wfm_core::time::{max_time, min_time};

/// One cycle occurrence and the instant its tasks may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Occurrence {
    /// Natural occurrence time of the cycle.
    pub cycle: DateTime<Utc>,
    /// `cycle + activation_offset`.
    pub activation: DateTime<Utc>,
}

/// A rule generating recurring cycle times.
///
/// Implementors supply the raw occurrence search; the activation-offset
/// handling, bounds and iteration are shared.
pub trait CycleSpec {
    /// Group label, not required to be unique.
    fn group(&self) -> &str;

    /// Signed delay between an occurrence and its activation.
    fn activation_offset(&self) -> Duration;

    /// Earliest occurrence `>= reftime`.
    fn next_occurrence(&self, reftime: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// Latest occurrence `<= reftime`.
    fn previous_occurrence(&self, reftime: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// Whether `t` is an occurrence.
    fn contains(&self, t: DateTime<Utc>) -> bool;

    /// Pair an occurrence time with its activation time.
    fn occurrence(&self, cycle: DateTime<Utc>) -> Option<Occurrence> {
        let activation = cycle.checked_add_signed(self.activation_offset())?;
        Some(Occurrence { cycle, activation })
    }

    /// Next occurrence at or after `reftime`.
    ///
    /// With `by_activation` the search compares activation times instead, so
    /// the result is the first occurrence whose activation is `>= reftime`.
    fn next(&self, reftime: DateTime<Utc>, by_activation: bool) -> Option<Occurrence> {
        let target = if by_activation {
            reftime.checked_sub_signed(self.activation_offset())?
        } else {
            reftime
        };
        self.next_occurrence(target).and_then(|t| self.occurrence(t))
    }

    /// Previous occurrence at or before `reftime`; mirror of [`CycleSpec::next`].
    fn previous(&self, reftime: DateTime<Utc>, by_activation: bool) -> Option<Occurrence> {
        let target = if by_activation {
            reftime.checked_sub_signed(self.activation_offset())?
        } else {
            reftime
        };
        self.previous_occurrence(target).and_then(|t| self.occurrence(t))
    }

    fn first(&self) -> Option<Occurrence> {
        self.next(min_time(), false)
    }

    fn last(&self) -> Option<Occurrence> {
        self.previous(max_time(), false)
    }

    /// Lazy forward sequence of occurrences starting at `from`.
    fn each(&self, from: DateTime<Utc>, by_activation: bool) -> Occurrences<'_, Self> {
        Occurrences {
            spec: self,
            cursor: Some(from),
            by_activation,
        }
    }
}

/// Iterator returned by [`CycleSpec::each`].
///
/// Cloning yields an independent iterator resuming from the same point.
#[derive(Debug)]
pub struct Occurrences<'a, C: ?Sized> {
    spec: &'a C,
    cursor: Option<DateTime<Utc>>,
    by_activation: bool,
}

impl<C: ?Sized> Clone for Occurrences<'_, C> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec,
            cursor: self.cursor,
            by_activation: self.by_activation,
        }
    }
}

impl<C: CycleSpec + ?Sized> Iterator for Occurrences<'_, C> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        let from = self.cursor?;
        let found = self.spec.next(from, self.by_activation);
        self.cursor = found.and_then(|o| {
            let anchor = if self.by_activation { o.activation } else { o.cycle };
            anchor.checked_add_signed(Duration::seconds(1))
        });
        found
    }
}
