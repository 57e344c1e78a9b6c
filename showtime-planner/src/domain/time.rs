//! Showtime handling.
//!
//! Showtimes are recorded as local wall-clock timestamps with no timezone.
//! This module parses the textual forms a form or JSON document may carry
//! and provides minute arithmetic for computing when a showing ends.

use chrono::{DateTime, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Formats tried in order when parsing a showtime.
const FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Error returned when a timestamp is not a valid date-time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimestampError {
    input: String,
    reason: &'static str,
}

/// A local wall-clock instant at minute (or finer) precision.
///
/// # Examples
///
/// ```
/// use showtime_planner::domain::ShowTime;
/// use chrono::Duration;
///
/// let start = ShowTime::parse("2024-03-15T23:10").unwrap();
/// let end = start + Duration::minutes(95);
/// assert_eq!(end.to_string(), "2024-03-16 00:45");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowTime(NaiveDateTime);

impl ShowTime {
    /// Wrap an existing date-time.
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Parse a local timestamp.
    ///
    /// Accepts `YYYY-MM-DDTHH:MM[:SS[.fff]]`, the same with a space instead
    /// of `T`, and RFC 3339. For RFC 3339 input the offset is discarded and
    /// the wall-clock reading is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use showtime_planner::domain::ShowTime;
    ///
    /// assert!(ShowTime::parse("2024-03-15T19:30").is_ok());
    /// assert!(ShowTime::parse("2024-03-15 19:30:00").is_ok());
    /// assert!(ShowTime::parse("2024-03-15T19:30:00+01:00").is_ok());
    ///
    /// assert!(ShowTime::parse("").is_err());
    /// assert!(ShowTime::parse("19:30").is_err());
    /// assert!(ShowTime::parse("2024-02-30T10:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TimestampError {
                input: s.to_string(),
                reason: "empty",
            });
        }

        for format in FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self(dt));
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.naive_local()));
        }

        Err(TimestampError {
            input: s.to_string(),
            reason: "not a recognised date-time",
        })
    }

    /// Add a duration, returning `None` on overflow.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        self.0.checked_add_signed(duration).map(Self)
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Time of day as "HH:MM".
    pub fn clock(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    /// Calendar date as "Fri 15 Mar".
    pub fn day_label(&self) -> String {
        self.0.format("%a %-d %b").to_string()
    }
}

impl Add<Duration> for ShowTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add(rhs).expect("time overflow")
    }
}

impl fmt::Debug for ShowTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShowTime({})", self.0.format("%Y-%m-%d %H:%M"))
    }
}

impl fmt::Display for ShowTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}
