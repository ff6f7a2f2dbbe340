//! # Temporal Types: UTC Dates and Timestamps
//!
//! Two types cover every point in time the engine handles:
//!
//! - [`DeclarationDate`]: a calendar day, always read as UTC midnight. Used
//!   for customs declaration dates and rule effective windows.
//! - [`Timestamp`]: a UTC instant truncated to seconds. Used for pack
//!   generation times.
//!
//! Neither type has a local-time constructor. Year extraction for threshold
//! aggregation is therefore always the UTC calendar year.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CbamError;

/// A calendar day interpreted as UTC midnight.
///
/// Serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeclarationDate(NaiveDate);

impl DeclarationDate {
    /// Parse a strict `YYYY-MM-DD` string.
    ///
    /// Surrounding whitespace is ignored. The year must be exactly four
    /// digits and month/day exactly two; `2026-1-5`, `2026/01/05` and
    /// `+2026-01-05` are all rejected, as are impossible days like
    /// `2026-02-30`.
    pub fn parse_strict(raw: &str) -> Result<Self, CbamError> {
        let trimmed = raw.trim();
        if !matches_iso_day_pattern(trimmed) {
            return Err(CbamError::InvalidDate(format!(
                "expected YYYY-MM-DD, got {trimmed:?}"
            )));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| CbamError::InvalidDate(format!("{trimmed:?}: {e}")))
    }

    /// Build a date from its components. Returns `None` for impossible days.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The UTC calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Access the inner `NaiveDate`.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// The instant this day starts, in UTC.
    pub fn midnight_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.0.and_time(chrono::NaiveTime::MIN))
    }

    /// Whole days from `self` to `other` (negative when `other` is earlier).
    pub fn days_until(&self, other: DeclarationDate) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Shift by a signed number of days. `None` if the result is out of range.
    pub fn offset_days(&self, days: i64) -> Option<Self> {
        let magnitude = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(magnitude)
        } else {
            self.0.checked_sub_days(magnitude)
        };
        shifted.map(Self)
    }

    /// Render as `YYYY-MM-DD`.
    pub fn to_iso_date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl From<NaiveDate> for DeclarationDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::fmt::Display for DeclarationDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso_date())
    }
}

impl TryFrom<String> for DeclarationDate {
    type Error = CbamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_strict(&value)
    }
}

impl From<DeclarationDate> for String {
    fn from(value: DeclarationDate) -> Self {
        value.to_iso_date()
    }
}

fn matches_iso_day_pattern(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`]: from an RFC 3339 string with `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 timestamp.
    ///
    /// Only the `Z` suffix is accepted; explicit offsets, including
    /// `+00:00`, are rejected.
    pub fn parse(s: &str) -> Result<Self, CbamError> {
        if !s.ends_with('Z') {
            return Err(CbamError::InvalidDate(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CbamError::InvalidDate(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The UTC calendar day containing this instant.
    pub fn date(&self) -> DeclarationDate {
        DeclarationDate(self.0.date_naive())
    }

    /// Render as ISO 8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
