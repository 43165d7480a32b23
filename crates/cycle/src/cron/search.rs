//! Carry-propagating occurrence search over the cron field sets.
//!
//! The search keeps one candidate value per calendar field and repeatedly
//! settles it against the field sets, highest field first. Whenever a field
//! has to move, every lower field is reset (to its set minimum going forward,
//! to its maximum going backward) and the pass restarts. The candidate is an
//! occurrence once a full pass changes nothing. Running out of years is the
//! only way the search ends without a result.

use chrono::{DateTime, Datelike, Timelike, Utc};
use wfm_core::time::{days_in_month, utc};

use super::CronCycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
}

/// Outcome of one settling pass.
enum Pass {
    /// Every field already satisfies its set.
    Settled,
    /// A field moved; lower fields were reset.
    Changed,
    /// No year left in the set.
    Exhausted,
}

impl Candidate {
    fn from_time(t: DateTime<Utc>) -> Self {
        Self {
            year: i64::from(t.year()),
            month: i64::from(t.month()),
            day: i64::from(t.day()),
            hour: i64::from(t.hour()),
            minute: i64::from(t.minute()),
        }
    }

    fn to_time(self) -> Option<DateTime<Utc>> {
        utc(
            i32::try_from(self.year).ok()?,
            u32::try_from(self.month).ok()?,
            u32::try_from(self.day).ok()?,
            u32::try_from(self.hour).ok()?,
            u32::try_from(self.minute).ok()?,
        )
    }

    fn month_length(&self) -> i64 {
        match (i32::try_from(self.year), u32::try_from(self.month)) {
            (Ok(y), Ok(m)) => i64::from(days_in_month(y, m)),
            _ => 0,
        }
    }

    // ── forward ──────────────────────────────────────────────────

    fn reset_below_year_forward(&mut self, cron: &CronCycle) {
        self.month = cron.month.first();
        self.reset_below_month_forward(cron);
    }

    fn reset_below_month_forward(&mut self, cron: &CronCycle) {
        self.day = 1;
        self.reset_below_day_forward(cron);
    }

    fn reset_below_day_forward(&mut self, cron: &CronCycle) {
        self.hour = cron.hour.first();
        self.minute = cron.minute.first();
    }

    fn settle_forward(&mut self, cron: &CronCycle) -> Pass {
        match cron.year.ceil(self.year) {
            None => return Pass::Exhausted,
            Some(y) if y != self.year => {
                self.year = y;
                self.reset_below_year_forward(cron);
                return Pass::Changed;
            }
            Some(_) => {}
        }

        match cron.month.ceil(self.month) {
            None => {
                self.year += 1;
                self.reset_below_year_forward(cron);
                return Pass::Changed;
            }
            Some(m) if m != self.month => {
                self.month = m;
                self.reset_below_month_forward(cron);
                return Pass::Changed;
            }
            Some(_) => {}
        }

        match self.next_matching_day(cron) {
            None => {
                self.month += 1;
                self.reset_below_month_forward(cron);
                return Pass::Changed;
            }
            Some(d) if d != self.day => {
                self.day = d;
                self.reset_below_day_forward(cron);
                return Pass::Changed;
            }
            Some(_) => {}
        }

        match cron.hour.ceil(self.hour) {
            None => {
                self.day += 1;
                self.reset_below_day_forward(cron);
                return Pass::Changed;
            }
            Some(h) if h != self.hour => {
                self.hour = h;
                self.minute = cron.minute.first();
                return Pass::Changed;
            }
            Some(_) => {}
        }

        match cron.minute.ceil(self.minute) {
            None => {
                self.hour += 1;
                self.minute = cron.minute.first();
                Pass::Changed
            }
            Some(m) if m != self.minute => {
                self.minute = m;
                Pass::Changed
            }
            Some(_) => Pass::Settled,
        }
    }

    /// First valid day `>= self.day` in the candidate month passing the day rule.
    fn next_matching_day(&self, cron: &CronCycle) -> Option<i64> {
        (self.day.max(1)..=self.month_length()).find(|&d| cron.day_matches(self.year, self.month, d))
    }

    // ── backward ─────────────────────────────────────────────────

    fn reset_below_year_backward(&mut self, cron: &CronCycle) {
        self.month = cron.month.last();
        self.reset_below_month_backward(cron);
    }

    fn reset_below_month_backward(&mut self, cron: &CronCycle) {
        // Clamped to the real month length by `previous_matching_day`.
        self.day = 31;
        self.reset_below_day_backward(cron);
    }

    fn reset_below_day_backward(&mut self, cron: &CronCycle) {
        self.hour = cron.hour.last();
        self.minute = cron.minute.last();
    }

    fn settle_backward(&mut self, cron: &CronCycle) -> Pass {
        match cron.year.floor(self.year) {
            None => return Pass::Exhausted,
            Some(y) if y != self.year => {
                self.year = y;
                self.reset_below_year_backward(cron);
                return Pass::Changed;
            }
            Some(_) => {}
        }

        match cron.month.floor(self.month) {
            None => {
                self.year -= 1;
                self.reset_below_year_backward(cron);
                return Pass::Changed;
            }
            Some(m) if m != self.month => {
                self.month = m;
                self.reset_below_month_backward(cron);
                return Pass::Changed;
            }
            Some(_) => {}
        }

        match self.previous_matching_day(cron) {
            None => {
                self.month -= 1;
                self.reset_below_month_backward(cron);
                return Pass::Changed;
            }
            Some(d) if d != self.day => {
                self.day = d;
                self.reset_below_day_backward(cron);
                return Pass::Changed;
            }
            Some(_) => {}
        }

        match cron.hour.floor(self.hour) {
            None => {
                self.day -= 1;
                self.reset_below_day_backward(cron);
                return Pass::Changed;
            }
            Some(h) if h != self.hour => {
                self.hour = h;
                self.minute = cron.minute.last();
                return Pass::Changed;
            }
            Some(_) => {}
        }

        match cron.minute.floor(self.minute) {
            None => {
                self.hour -= 1;
                self.minute = cron.minute.last();
                Pass::Changed
            }
            Some(m) if m != self.minute => {
                self.minute = m;
                Pass::Changed
            }
            Some(_) => Pass::Settled,
        }
    }

    /// Last valid day `<= self.day` in the candidate month passing the day rule.
    fn previous_matching_day(&self, cron: &CronCycle) -> Option<i64> {
        (1..=self.day.min(self.month_length()))
            .rev()
            .find(|&d| cron.day_matches(self.year, self.month, d))
    }
}

/// Earliest occurrence at or after `from` (which must be a whole minute).
pub(super) fn search_forward(cron: &CronCycle, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let mut candidate = Candidate::from_time(from);
    loop {
        match candidate.settle_forward(cron) {
            Pass::Settled => return candidate.to_time(),
            Pass::Changed => continue,
            Pass::Exhausted => return None,
        }
    }
}

/// Latest occurrence at or before `from` (which must be a whole minute).
pub(super) fn search_backward(cron: &CronCycle, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let mut candidate = Candidate::from_time(from);
    loop {
        match candidate.settle_backward(cron) {
            Pass::Settled => return candidate.to_time(),
            Pass::Changed => continue,
            Pass::Exhausted => return None,
        }
    }
}
