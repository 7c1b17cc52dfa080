//! UTC instants used for message, feedback and window boundaries.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Creates a timestamp from Unix seconds, falling back to the epoch when out of range.
    pub fn from_unix_secs(secs: i64) -> Self {
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }

    /// Midnight UTC at the start of `date`.
    pub fn start_of_day(date: NaiveDate) -> Self {
        Self(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
    }

    /// Calendar day in UTC.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Whole seconds elapsed since `earlier`; negative when `earlier` is later.
    pub fn secs_since(&self, earlier: &Timestamp) -> i64 {
        (self.0 - earlier.0).num_seconds()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
