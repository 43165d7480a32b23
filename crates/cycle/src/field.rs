//! Cron field sets: parsing and ordered lookup.

use wfm_core::time::{MAX_YEAR, MIN_YEAR};
use wfm_core::{ConfigError, Result};

/// The six fields of a cycle cron expression, in textual order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Minute,
    Hour,
    Day,
    Month,
    Year,
    Weekday,
}

impl FieldKind {
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Minute,
        FieldKind::Hour,
        FieldKind::Day,
        FieldKind::Month,
        FieldKind::Year,
        FieldKind::Weekday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::Day => "day",
            FieldKind::Month => "month",
            FieldKind::Year => "year",
            FieldKind::Weekday => "weekday",
        }
    }

    /// Inclusive domain of the field.
    pub fn range(self) -> (u32, u32) {
        match self {
            FieldKind::Minute => (0, 59),
            FieldKind::Hour => (0, 23),
            FieldKind::Day => (1, 31),
            FieldKind::Month => (1, 12),
            FieldKind::Year => (MIN_YEAR as u32, MAX_YEAR as u32),
            FieldKind::Weekday => (0, 6),
        }
    }
}

/// A validated, sorted, deduplicated set of values for one cron field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    kind: FieldKind,
    values: Vec<u32>,
}

impl FieldSet {
    /// Parse one field: `*`, `*/N`, `N`, `N-M`, `N-M/S`, or a comma union of those.
    pub fn parse(kind: FieldKind, text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(invalid(kind, text, "empty field"));
        }

        let mut values = Vec::new();
        for part in text.split(',') {
            values.extend(parse_part(kind, part)?);
        }
        values.sort_unstable();
        values.dedup();

        Ok(Self { kind, values })
    }

    /// Every value in the field's domain.
    pub fn full(kind: FieldKind) -> Self {
        let (min, max) = kind.range();
        Self {
            kind,
            values: (min..=max).collect(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Whether the set covers its entire domain (an unrestricted field).
    pub fn is_full(&self) -> bool {
        let (min, max) = self.kind.range();
        self.values.len() == (max - min + 1) as usize
    }

    pub fn contains(&self, value: i64) -> bool {
        u32::try_from(value)
            .map(|v| self.values.binary_search(&v).is_ok())
            .unwrap_or(false)
    }

    /// Smallest member (sets are never empty).
    pub fn first(&self) -> i64 {
        self.values.first().copied().map(i64::from).unwrap_or_default()
    }

    /// Largest member (sets are never empty).
    pub fn last(&self) -> i64 {
        self.values.last().copied().map(i64::from).unwrap_or_default()
    }

    /// Smallest member `>= value`.
    pub fn ceil(&self, value: i64) -> Option<i64> {
        self.values.iter().map(|&v| i64::from(v)).find(|&v| v >= value)
    }

    /// Largest member `<= value`.
    pub fn floor(&self, value: i64) -> Option<i64> {
        self.values.iter().rev().map(|&v| i64::from(v)).find(|&v| v <= value)
    }
}

fn invalid(kind: FieldKind, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidField {
        field: kind.name(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number(kind: FieldKind, text: &str) -> Result<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(kind, text, "expected a non-negative integer"));
    }
    let value: u32 = text
        .parse()
        .map_err(|_| invalid(kind, text, "number too large"))?;
    let (min, max) = kind.range();
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field: kind.name(),
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn parse_part(kind: FieldKind, part: &str) -> Result<Vec<u32>> {
    let (range, step) = match part.split_once('/') {
        Some((range, step)) => {
            let step: u32 = step
                .parse()
                .ok()
                .filter(|&s| s > 0)
                .ok_or_else(|| invalid(kind, part, "step must be a positive integer"))?;
            (range, step)
        }
        None => (part, 1),
    };

    let (start, end) = if range == "*" {
        kind.range()
    } else if let Some((lo, hi)) = range.split_once('-') {
        let lo = parse_number(kind, lo)?;
        let hi = parse_number(kind, hi)?;
        if lo > hi {
            return Err(invalid(kind, part, "range start exceeds range end"));
        }
        (lo, hi)
    } else {
        if step != 1 || part.contains('/') {
            return Err(invalid(kind, part, "a step needs '*' or a range"));
        }
        let v = parse_number(kind, range)?;
        (v, v)
    };

    Ok((start..=end).step_by(step as usize).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_is_full() {
        let set = FieldSet::parse(FieldKind::Hour, "*").unwrap();
        assert!(set.is_full());
        assert_eq!(set.values().len(), 24);
    }

    #[test]
    fn explicit_full_list_counts_as_full() {
        let set = FieldSet::parse(FieldKind::Weekday, "0-6").unwrap();
        assert!(set.is_full());
    }

    #[test]
    fn wildcard_step_starts_at_field_minimum() {
        let set = FieldSet::parse(FieldKind::Minute, "*/15").unwrap();
        assert_eq!(set.values(), &[0, 15, 30, 45]);
        let days = FieldSet::parse(FieldKind::Day, "*/10").unwrap();
        assert_eq!(days.values(), &[1, 11, 21, 31]);
    }

    #[test]
    fn stepped_range() {
        let set = FieldSet::parse(FieldKind::Hour, "0-18/6").unwrap();
        assert_eq!(set.values(), &[0, 6, 12, 18]);
    }

    #[test]
    fn unions_are_sorted_and_deduplicated() {
        let set = FieldSet::parse(FieldKind::Day, "15,1-3,2,31").unwrap();
        assert_eq!(set.values(), &[1, 2, 3, 15, 31]);
        assert!(!set.is_full());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(
            FieldSet::parse(FieldKind::Month, "13"),
            Err(ConfigError::OutOfRange {
                field: "month",
                value: 13,
                min: 1,
                max: 12
            })
        );
        assert!(FieldSet::parse(FieldKind::Day, "0").is_err());
        assert!(FieldSet::parse(FieldKind::Weekday, "7").is_err());
        assert!(FieldSet::parse(FieldKind::Year, "1899").is_err());
        assert!(FieldSet::parse(FieldKind::Year, "1950-1960").is_ok());
    }

    #[test]
    fn malformed_fields_are_rejected() {
        for bad in ["", "a", "5-", "-5", "10-5", "*/0", "5/2", "1,,2", "*/x", "1-3/"] {
            assert!(
                FieldSet::parse(FieldKind::Minute, bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn ceil_and_floor() {
        let set = FieldSet::parse(FieldKind::Hour, "0,12").unwrap();
        assert_eq!(set.ceil(5), Some(12));
        assert_eq!(set.ceil(12), Some(12));
        assert_eq!(set.ceil(13), None);
        assert_eq!(set.floor(11), Some(0));
        assert_eq!(set.floor(-1), None);
        assert!(set.contains(12));
        assert!(!set.contains(-12));
    }
}
