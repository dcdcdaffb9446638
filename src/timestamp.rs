//! Timestamp helpers for cache expiry
//!
//! Cutoff timestamps are integer seconds since the Unix epoch, derived from
//! local wall-clock time so that operator-supplied dates ("expire tiles older
//! than 2024-06-01T00:00:00") mean the machine's own calendar. These feed the
//! [`cleanup`](crate::cleanup) cutoff and anything else in the host system
//! that reasons about file ages.

use chrono::{Local, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::constants::time;
use crate::errors::{TimestampError, TimestampResult};

/// A relative offset into the past, summed across all fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffset {
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeOffset {
    /// Offset of the given number of weeks
    pub fn weeks(mut self, weeks: i64) -> Self {
        self.weeks = weeks;
        self
    }

    /// Offset of the given number of days
    pub fn days(mut self, days: i64) -> Self {
        self.days = days;
        self
    }

    /// Offset of the given number of hours
    pub fn hours(mut self, hours: i64) -> Self {
        self.hours = hours;
        self
    }

    /// Offset of the given number of minutes
    pub fn minutes(mut self, minutes: i64) -> Self {
        self.minutes = minutes;
        self
    }

    /// Offset of the given number of seconds
    pub fn seconds(mut self, seconds: i64) -> Self {
        self.seconds = seconds;
        self
    }

    fn as_delta(&self) -> TimeDelta {
        TimeDelta::weeks(self.weeks)
            + TimeDelta::days(self.days)
            + TimeDelta::hours(self.hours)
            + TimeDelta::minutes(self.minutes)
            + TimeDelta::seconds(self.seconds)
    }
}

/// Epoch seconds for "now minus the given offset"
///
/// ```
/// use tilesweep::timestamp::{timestamp_before, TimeOffset};
///
/// let cutoff = timestamp_before(TimeOffset::default().days(7));
/// ```
pub fn timestamp_before(offset: TimeOffset) -> i64 {
    (Local::now() - offset.as_delta()).timestamp()
}

/// Epoch seconds for an ISO date string of the exact shape
/// `YYYY-MM-DDTHH:MM:SS`, interpreted as local time
///
/// # Errors
///
/// Returns `TimestampError::InvalidFormat` for any other string shape,
/// including a missing seconds field.
pub fn timestamp_from_isodate(value: &str) -> TimestampResult<i64> {
    let datetime = NaiveDateTime::parse_from_str(value, time::ISO_DATETIME_FORMAT).map_err(
        |source| TimestampError::InvalidFormat {
            value: value.to_string(),
            source,
        },
    )?;
    timestamp_from_datetime(datetime)
}

/// Epoch seconds for an already-parsed wall-clock datetime, interpreted as
/// local time
///
/// # Errors
///
/// Returns `TimestampError::NonexistentLocalTime` if the wall-clock time
/// falls in a DST gap. An ambiguous time (clocks rolled back) resolves to
/// its earlier occurrence.
pub fn timestamp_from_datetime(datetime: NaiveDateTime) -> TimestampResult<i64> {
    datetime
        .and_local_timezone(Local)
        .earliest()
        .map(|local| local.timestamp())
        .ok_or(TimestampError::NonexistentLocalTime { datetime })
}
