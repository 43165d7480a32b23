//! Cron-style cycle definitions.
//!
//! A [`CronCycle`] is six field sets in the order
//! `minute hour day month year weekday`. Day-of-month and weekday combine
//! with the usual cron rule: when both are restricted a date matches if
//! either one matches, otherwise the restricted one (if any) decides.

mod search;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use wfm_core::time::{ceil_to_minute, floor_to_minute, max_time, min_time, weekday};
use wfm_core::{ConfigError, Result};

use crate::field::{FieldKind, FieldSet};
use crate::spec::CycleSpec;

/// A recurring cycle generated by cron field sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CronDefinition", into = "CronDefinition")]
pub struct CronCycle {
    group: String,
    expression: String,
    pub(crate) minute: FieldSet,
    pub(crate) hour: FieldSet,
    pub(crate) day: FieldSet,
    pub(crate) month: FieldSet,
    pub(crate) year: FieldSet,
    pub(crate) weekday: FieldSet,
    activation_offset: Duration,
    position: Option<DateTime<Utc>>,
}

/// Serialized shape of a [`CronCycle`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronDefinition {
    pub group: String,
    pub cron: String,
    #[serde(default, with = "wfm_core::time::serde_duration")]
    pub activation_offset: Duration,
}

impl CronCycle {
    /// Build from the six field strings `[minute, hour, day, month, year, weekday]`.
    pub fn new(group: impl Into<String>, fields: [&str; 6]) -> Result<Self> {
        let mut sets = Vec::with_capacity(6);
        for (kind, text) in FieldKind::ALL.into_iter().zip(fields) {
            sets.push(FieldSet::parse(kind, text)?);
        }
        let [minute, hour, day, month, year, weekday]: [FieldSet; 6] = sets
            .try_into()
            .map_err(|_| ConfigError::Other("cron requires six fields".to_string()))?;

        Ok(Self {
            group: group.into(),
            expression: fields.map(str::trim).join(" "),
            minute,
            hour,
            day,
            month,
            year,
            weekday,
            activation_offset: Duration::zero(),
            position: None,
        })
    }

    /// Build from a single space-delimited expression, e.g. `"0 0,12 * * * *"`.
    pub fn parse(group: impl Into<String>, expression: &str) -> Result<Self> {
        let parts: Vec<&str> = expression.split_whitespace().collect();
        let fields: [&str; 6] = parts.as_slice().try_into().map_err(|_| ConfigError::InvalidField {
            field: "cron",
            value: expression.to_string(),
            reason: format!("expected 6 fields, found {}", parts.len()),
        })?;
        Self::new(group, fields)
    }

    pub fn with_activation_offset(mut self, offset: Duration) -> Self {
        self.activation_offset = offset;
        self
    }

    /// The normalized source expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn field(&self, kind: FieldKind) -> &FieldSet {
        match kind {
            FieldKind::Minute => &self.minute,
            FieldKind::Hour => &self.hour,
            FieldKind::Day => &self.day,
            FieldKind::Month => &self.month,
            FieldKind::Year => &self.year,
            FieldKind::Weekday => &self.weekday,
        }
    }

    pub fn position(&self) -> Option<DateTime<Utc>> {
        self.position
    }

    pub fn set_position(&mut self, position: Option<DateTime<Utc>>) {
        self.position = position;
    }

    /// Day-of-month / weekday disjunction for one calendar date.
    pub(crate) fn day_matches(&self, year: i64, month: i64, day: i64) -> bool {
        let weekday_matches = || {
            match (i32::try_from(year), u32::try_from(month), u32::try_from(day)) {
                (Ok(y), Ok(m), Ok(d)) => weekday(y, m, d)
                    .map(|w| self.weekday.contains(i64::from(w)))
                    .unwrap_or(false),
                _ => false,
            }
        };

        match (self.day.is_full(), self.weekday.is_full()) {
            (true, true) => true,
            (true, false) => weekday_matches(),
            (false, true) => self.day.contains(day),
            (false, false) => self.day.contains(day) || weekday_matches(),
        }
    }

    /// Every occurrence of a cycle whose year field is restricted.
    pub fn all(&self) -> Result<Vec<DateTime<Utc>>> {
        if self.year.is_full() {
            return Err(ConfigError::Other(format!(
                "cannot expand cycle '{}' with an unrestricted year",
                self.group
            )));
        }
        Ok(self.each(min_time(), false).map(|o| o.cycle).collect())
    }
}

impl TryFrom<CronDefinition> for CronCycle {
    type Error = ConfigError;

    fn try_from(def: CronDefinition) -> Result<Self> {
        Ok(Self::parse(def.group, &def.cron)?.with_activation_offset(def.activation_offset))
    }
}

impl From<CronCycle> for CronDefinition {
    fn from(cycle: CronCycle) -> Self {
        Self {
            group: cycle.group,
            cron: cycle.expression,
            activation_offset: cycle.activation_offset,
        }
    }
}

impl CycleSpec for CronCycle {
    fn group(&self) -> &str {
        &self.group
    }

    fn activation_offset(&self) -> Duration {
        self.activation_offset
    }

    fn next_occurrence(&self, reftime: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if reftime > max_time() {
            return None;
        }
        let from = ceil_to_minute(reftime)?.max(min_time());
        if from > max_time() {
            return None;
        }
        search::search_forward(self, from)
    }

    fn previous_occurrence(&self, reftime: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let from = floor_to_minute(reftime).min(max_time());
        if from < min_time() {
            return None;
        }
        search::search_backward(self, from)
    }

    fn contains(&self, t: DateTime<Utc>) -> bool {
        use chrono::{Datelike, Timelike};

        floor_to_minute(t) == t
            && self.year.contains(i64::from(t.year()))
            && self.month.contains(i64::from(t.month()))
            && self.hour.contains(i64::from(t.hour()))
            && self.minute.contains(i64::from(t.minute()))
            && self.day_matches(i64::from(t.year()), i64::from(t.month()), i64::from(t.day()))
    }
}
