//! Time types for calendar events.
//!
//! This module provides [`resolve`] for turning the start/end strings found in
//! event payloads into a [`ResolvedTime`], [`DateBound`] for the `from`/`to`
//! filters of an events query, and [`TimeWindow`] for building query ranges.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format of a bare calendar date on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A raw start/end value that is neither a timestamp nor a bare date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{value:?} is neither an RFC 3339 timestamp nor a YYYY-MM-DD date")]
pub struct DateFormatError {
    /// The rejected input.
    pub value: String,
}

/// An event boundary after resolution.
///
/// Date-only values resolve to midnight UTC with `all_day` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTime {
    /// The resolved instant, in UTC.
    pub instant: DateTime<Utc>,
    /// True iff the raw value carried no time of day.
    pub all_day: bool,
}

/// Resolves a raw event boundary.
///
/// Tries a full RFC 3339 timestamp first, then a bare `YYYY-MM-DD` date.
/// Timestamps must use an uppercase `T` between date and time; the space and
/// lowercase forms chrono also accepts are rejected.
///
/// # Errors
///
/// Returns [`DateFormatError`] when the value matches neither format.
pub fn resolve(raw: &str) -> Result<ResolvedTime, DateFormatError> {
    if raw.as_bytes().get(10) == Some(&b'T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(ResolvedTime {
                instant: dt.with_timezone(&Utc),
                all_day: false,
            });
        }
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(|date| ResolvedTime {
            instant: date.and_time(NaiveTime::MIN).and_utc(),
            all_day: true,
        })
        .map_err(|_| DateFormatError {
            value: raw.to_string(),
        })
}

/// Formats an instant the way the API expects timestamps in query strings.
pub fn format_wire_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One end of an events query range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DateBound {
    /// A calendar date, interpreted by the server in the request's time zone.
    Date(NaiveDate),
    /// A specific instant.
    Instant(DateTime<Utc>),
}

impl DateBound {
    /// Returns the query-string form of this bound.
    pub fn to_wire(&self) -> String {
        match self {
            Self::Date(date) => date.format(DATE_FORMAT).to_string(),
            Self::Instant(dt) => format_wire_timestamp(dt),
        }
    }
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl From<NaiveDate> for DateBound {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<DateTime<Utc>> for DateBound {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Instant(dt)
    }
}

/// A time window for querying calendar events.
///
/// Represents a half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Creates a time window starting from now extending the given duration.
    ///
    /// Returns `None` for a negative duration or an end past the range chrono
    /// can represent.
    pub fn from_now(now: DateTime<Utc>, duration: Duration) -> Option<Self> {
        if duration < Duration::zero() {
            return None;
        }
        now.checked_add_signed(duration).map(|end| Self::new(now, end))
    }

    /// Returns the duration of this time window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Returns the window as date-only query bounds (UTC calendar days).
    pub fn date_bounds(&self) -> (DateBound, DateBound) {
        (
            DateBound::Date(self.start.date_naive()),
            DateBound::Date(self.end.date_naive()),
        )
    }
}
