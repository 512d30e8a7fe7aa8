//! UTC datetime handling
//!
//! Every timestamp stored or compared by the system is `DateTime<Utc>`.
//! Values arriving with an offset are converted, and naive values are
//! interpreted either as UTC or in an explicit [`Timezone`]. Local time is
//! only ever produced for presentation.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid window: start {start} must be before end {end}")]
    InvalidWindow {
        start: String,
        end: String,
    },

    #[error("Local time {local} does not exist in {timezone}")]
    NonexistentLocalTime {
        local: String,
        timezone: String,
    },

    #[error("Local time {local} is ambiguous in {timezone}")]
    AmbiguousLocalTime {
        local: String,
        timezone: String,
    },

    #[error("Unparseable timestamp: {0}")]
    Unparseable(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Timezone wrapper for user-facing local dates
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timezone::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Timezone)
            .map_err(|_| TemporalError::UnknownTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Interprets a naive local datetime in this timezone and converts to UTC
    ///
    /// Local times skipped or repeated by a DST transition are rejected
    /// rather than guessed.
    pub fn to_utc(&self, local: NaiveDateTime) -> Result<DateTime<Utc>, TemporalError> {
        match self.0.from_local_datetime(&local) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            LocalResult::None => Err(TemporalError::NonexistentLocalTime {
                local: local.to_string(),
                timezone: self.0.name().to_string(),
            }),
            LocalResult::Ambiguous(_, _) => Err(TemporalError::AmbiguousLocalTime {
                local: local.to_string(),
                timezone: self.0.name().to_string(),
            }),
        }
    }

    /// Gets the start of day (00:00:00) in this timezone as UTC
    pub fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>, TemporalError> {
        self.to_utc(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Converts an offset-carrying datetime to UTC
pub fn ensure_utc(value: DateTime<FixedOffset>) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

/// Treats a naive datetime as already being in UTC
pub fn naive_as_utc(value: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&value)
}

/// Parses a timestamp into UTC
///
/// RFC 3339 input with an offset is converted; input without an offset
/// (`2024-03-01T09:30:00`) is taken to be UTC already.
pub fn parse_utc(input: &str) -> Result<DateTime<Utc>, TemporalError> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ensure_utc(dt));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .map(naive_as_utc)
        .map_err(|_| TemporalError::Unparseable(input.to_string()))
}

/// A half-open UTC time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive)
    pub start: DateTime<Utc>,
    /// End of the window (exclusive)
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window, rejecting empty or inverted ranges
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        if start >= end {
            return Err(TemporalError::InvalidWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns true if this window contains the given timestamp
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// Returns true if this window overlaps with another
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}
