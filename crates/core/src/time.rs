//! Calendar arithmetic shared by the cron and interval cycles.
//!
//! Covers three grammars used throughout cycle definitions:
//! - durations: `[+|-][[[DD:]HH:]MM:]SS`, e.g. `01:00:00:00` is one day
//! - cycle stamps: `YYYYMMDDHHMM` (and `YYYYMMDDHHMMSS` for time dependencies)
//! - calendar validity: month lengths and leap years

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};

use crate::error::{ConfigError, Result};

/// Earliest year a cycle may occupy.
pub const MIN_YEAR: i32 = 1900;
/// Latest year a cycle may occupy.
pub const MAX_YEAR: i32 = 9999;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Seconds since the epoch of 1900-01-01T00:00:00Z.
const MIN_TIMESTAMP: i64 = -2_208_988_800;
/// Seconds since the epoch of 9999-12-31T23:59:00Z.
const MAX_TIMESTAMP: i64 = 253_402_300_740;

/// Earliest representable cycle time (1900-01-01T00:00Z).
pub fn min_time() -> DateTime<Utc> {
    DateTime::from_timestamp(MIN_TIMESTAMP, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Latest representable cycle time (9999-12-31T23:59Z).
pub fn max_time() -> DateTime<Utc> {
    DateTime::from_timestamp(MAX_TIMESTAMP, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Build a UTC instant from calendar fields, `None` if the date is invalid.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).single()
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`; zero for a month outside 1-12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Whether `year-month-day` names a real calendar date.
pub fn is_valid_date(year: i32, month: u32, day: u32) -> bool {
    day >= 1 && day <= days_in_month(year, month)
}

/// Day of the week with Sunday as 0, `None` for an invalid date.
pub fn weekday(year: i32, month: u32, day: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.weekday().num_days_from_sunday())
}

/// Truncate an instant to the start of its minute.
pub fn floor_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t - Duration::seconds(i64::from(t.second())) - Duration::nanoseconds(i64::from(t.nanosecond()))
}

/// Round an instant up to the next whole minute (unchanged if already whole).
///
/// `None` when the next minute is past the last instant chrono can represent.
pub fn ceil_to_minute(t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let floor = floor_to_minute(t);
    if floor == t {
        Some(t)
    } else {
        floor.checked_add_signed(Duration::minutes(1))
    }
}

/// Parse a signed `[[[DD:]HH:]MM:]SS` duration.
///
/// The rightmost component is always seconds, so `"300"`, `"05:00"` and
/// `"00:05:00"` are all five minutes. A leading `-` negates the whole value.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let err = || ConfigError::InvalidDuration(s.to_string());
    let trimmed = s.trim();
    let (sign, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let parts: Vec<&str> = body.split(':').collect();
    if body.is_empty() || parts.len() > 4 {
        return Err(err());
    }

    let multipliers = [1, SECS_PER_MINUTE, SECS_PER_HOUR, SECS_PER_DAY];
    let mut total: i64 = 0;
    for (part, multiplier) in parts.iter().rev().zip(multipliers) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let n: i64 = part.parse().map_err(|_| err())?;
        total = n
            .checked_mul(multiplier)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(err)?;
    }

    Duration::try_seconds(sign * total).ok_or_else(err)
}

/// Format a duration in the grammar accepted by [`parse_duration`].
///
/// The day component is omitted when zero: `HH:MM:SS` or `DD:HH:MM:SS`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.num_seconds();
    let sign = if secs < 0 { "-" } else { "" };
    let abs = secs.unsigned_abs();
    let days = abs / SECS_PER_DAY as u64;
    let hours = (abs % SECS_PER_DAY as u64) / SECS_PER_HOUR as u64;
    let minutes = (abs % SECS_PER_HOUR as u64) / SECS_PER_MINUTE as u64;
    let seconds = abs % SECS_PER_MINUTE as u64;
    if days > 0 {
        format!("{sign}{days:02}:{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Parse a `YYYYMMDDHHMM` or `YYYYMMDDHHMMSS` stamp as UTC.
pub fn parse_stamp(s: &str) -> Result<DateTime<Utc>> {
    let err = || ConfigError::InvalidTimestamp(s.to_string());
    let s_trim = s.trim();
    if !(s_trim.len() == 12 || s_trim.len() == 14) || !s_trim.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }

    let field = |range: std::ops::Range<usize>| -> Result<u32> {
        s_trim[range].parse::<u32>().map_err(|_| err())
    };
    let year = i32::try_from(field(0..4)?).map_err(|_| err())?;
    let second = if s_trim.len() == 14 { field(12..14)? } else { 0 };

    Utc.with_ymd_and_hms(
        year,
        field(4..6)?,
        field(6..8)?,
        field(8..10)?,
        field(10..12)?,
        second,
    )
    .single()
    .ok_or_else(err)
}

/// Format an instant as a 12-digit `YYYYMMDDHHMM` cycle stamp.
pub fn format_stamp(t: DateTime<Utc>) -> String {
    t.format("%Y%m%d%H%M").to_string()
}

/// Serde adapter storing a [`Duration`] in the `[DD:]HH:MM:SS` grammar.
///
/// Deserialization also accepts a bare integer number of seconds.
pub mod serde_duration {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Seconds(secs) => Duration::try_seconds(secs)
                .ok_or_else(|| serde::de::Error::custom(format!("duration {secs}s out of range"))),
            Raw::Text(text) => super::parse_duration(&text).map_err(serde::de::Error::custom),
        }
    }
}
