//! Fixed-period cycles between a start and an end time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use wfm_core::time::{format_duration, format_stamp, parse_duration, parse_stamp};
use wfm_core::{ConfigError, Result};

use crate::spec::CycleSpec;

/// Occurrences at `start + k * period` for every `k` that stays within `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntervalDefinition", into = "IntervalDefinition")]
pub struct IntervalCycle {
    group: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    period: Duration,
    activation_offset: Duration,
    position: Option<DateTime<Utc>>,
}

/// Serialized shape of an [`IntervalCycle`]: `"start end period"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalDefinition {
    pub group: String,
    pub interval: String,
    #[serde(default, with = "wfm_core::time::serde_duration")]
    pub activation_offset: Duration,
}

impl IntervalCycle {
    pub fn new(
        group: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: Duration,
    ) -> Result<Self> {
        if start > end {
            return Err(ConfigError::InvalidInterval(format!(
                "start {} is after end {}",
                format_stamp(start),
                format_stamp(end)
            )));
        }
        if period <= Duration::zero() {
            return Err(ConfigError::InvalidInterval(format!(
                "period {} must be positive",
                format_duration(period)
            )));
        }
        if period.subsec_nanos() != 0 {
            return Err(ConfigError::InvalidInterval(format!(
                "period {}ms is not a whole number of seconds",
                period.num_milliseconds()
            )));
        }

        Ok(Self {
            group: group.into(),
            start,
            end,
            period,
            activation_offset: Duration::zero(),
            position: None,
        })
    }

    /// Parse `"start end period"`, where `end` is either a stamp or a
    /// duration measured from `start`.
    pub fn parse(group: impl Into<String>, text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let [start, end, period] = parts.as_slice() else {
            return Err(ConfigError::InvalidInterval(format!(
                "expected 'start end period', got '{text}'"
            )));
        };

        let start = parse_stamp(start)?;
        let end = match parse_stamp(end) {
            Ok(end) => end,
            Err(_) => {
                let length = parse_duration(end)?;
                start.checked_add_signed(length).ok_or_else(|| {
                    ConfigError::InvalidInterval(format!("end offset '{end}' overflows"))
                })?
            }
        };
        let period = parse_duration(period)?;

        Self::new(group, start, end, period)
    }

    pub fn with_activation_offset(mut self, offset: Duration) -> Self {
        self.activation_offset = offset;
        self
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn position(&self) -> Option<DateTime<Utc>> {
        self.position
    }

    pub fn set_position(&mut self, position: Option<DateTime<Utc>>) {
        self.position = position;
    }

    /// `start + k * period`.
    fn nth(&self, k: i64) -> Option<DateTime<Utc>> {
        let secs = self.period.num_seconds().checked_mul(k)?;
        self.start.checked_add_signed(Duration::try_seconds(secs)?)
    }

    /// Whole periods between `start` and `t`, rounded toward zero.
    ///
    /// The period is at least one whole second, checked by [`IntervalCycle::new`].
    fn periods_until(&self, t: DateTime<Utc>) -> i64 {
        (t - self.start).num_seconds() / self.period.num_seconds().max(1)
    }
}

impl TryFrom<IntervalDefinition> for IntervalCycle {
    type Error = ConfigError;

    fn try_from(def: IntervalDefinition) -> Result<Self> {
        Ok(Self::parse(def.group, &def.interval)?.with_activation_offset(def.activation_offset))
    }
}

impl From<IntervalCycle> for IntervalDefinition {
    fn from(cycle: IntervalCycle) -> Self {
        Self {
            interval: format!(
                "{} {} {}",
                format_stamp(cycle.start),
                format_stamp(cycle.end),
                format_duration(cycle.period)
            ),
            group: cycle.group,
            activation_offset: cycle.activation_offset,
        }
    }
}

impl CycleSpec for IntervalCycle {
    fn group(&self) -> &str {
        &self.group
    }

    fn activation_offset(&self) -> Duration {
        self.activation_offset
    }

    fn next_occurrence(&self, reftime: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if reftime > self.end {
            return None;
        }
        if reftime <= self.start {
            return Some(self.start);
        }

        let mut k = self.periods_until(reftime);
        let mut candidate = self.nth(k)?;
        if candidate < reftime {
            k += 1;
            candidate = self.nth(k)?;
        }
        (candidate <= self.end).then_some(candidate)
    }

    fn previous_occurrence(&self, reftime: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if reftime < self.start {
            return None;
        }

        if reftime >= self.end {
            return Some(self.end);
        }
        self.nth(self.periods_until(reftime))
    }

    fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t <= self.end && self.nth(self.periods_until(t)) == Some(t)
    }
}
