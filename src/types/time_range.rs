//! Time windows at hour granularity, and the timeline's two independent time
//! values: the current instant and the analysis range.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeRangeError {
    #[error("Time range start {start} is after its end {end}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A `{start, end}` window of UTC instants, truncated to the hour, with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

fn truncate_to_hour(datetime: DateTime<Utc>) -> DateTime<Utc> {
    datetime
        .date_naive()
        .and_hms_opt(datetime.hour(), 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(datetime)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

fn last_hour_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + TimeDelta::hours(23)
}

impl TimeRange {
    /// Creates a range, truncating both ends to the hour.
    ///
    /// # Errors
    ///
    /// Returns [`TimeRangeError::Inverted`] if `start` is after `end` once truncated.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        let start = truncate_to_hour(start);
        let end = truncate_to_hour(end);
        if start > end {
            return Err(TimeRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// A point range at the hour containing `at`.
    pub fn instant(at: DateTime<Utc>) -> Self {
        let at = truncate_to_hour(at);
        Self { start: at, end: at }
    }

    /// Every hour of the given calendar days, inclusive on both ends.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Result<Self, TimeRangeError> {
        Self::new(start_of_day(first), last_hour_of_day(last))
    }

    /// The last full UTC day before `now`.
    pub fn last_complete_day(now: DateTime<Utc>) -> Self {
        let yesterday = now
            .date_naive()
            .checked_sub_days(Days::new(1))
            .unwrap_or(now.date_naive());
        Self {
            start: start_of_day(yesterday),
            end: last_hour_of_day(yesterday),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%dT%H:00"),
            self.end.format("%Y-%m-%dT%H:00")
        )
    }
}

/// Conversion of the various ways a caller can name a window into a [`TimeRange`].
pub trait AnyTimeRange {
    fn get_time_range(self) -> Option<TimeRange>;
}

impl AnyTimeRange for TimeRange {
    fn get_time_range(self) -> Option<TimeRange> {
        Some(self)
    }
}

impl AnyTimeRange for NaiveDate {
    fn get_time_range(self) -> Option<TimeRange> {
        TimeRange::days(self, self).ok()
    }
}

impl AnyTimeRange for (NaiveDate, NaiveDate) {
    fn get_time_range(self) -> Option<TimeRange> {
        TimeRange::days(self.0, self.1).ok()
    }
}

impl AnyTimeRange for (DateTime<Utc>, DateTime<Utc>) {
    fn get_time_range(self) -> Option<TimeRange> {
        TimeRange::new(self.0, self.1).ok()
    }
}

impl AnyTimeRange for &str {
    fn get_time_range(self) -> Option<TimeRange> {
        NaiveDate::parse_from_str(self, "%Y-%m-%d")
            .ok()?
            .get_time_range()
    }
}

/// The two independently settable values emitted by a timeline/playback widget.
///
/// Only a change of `analysis_range` warrants recomputing polygon values; the
/// current instant is a playback cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub current_instant: DateTime<Utc>,
    pub analysis_range: TimeRange,
}

impl Timeline {
    pub fn new(current_instant: DateTime<Utc>, analysis_range: TimeRange) -> Self {
        Self {
            current_instant: truncate_to_hour(current_instant),
            analysis_range,
        }
    }

    /// Moves the playback cursor. Returns `false` if it did not change.
    pub fn set_current_instant(&mut self, at: DateTime<Utc>) -> bool {
        let at = truncate_to_hour(at);
        if self.current_instant == at {
            return false;
        }
        self.current_instant = at;
        true
    }

    /// Replaces the analysis range. Returns `false` if it did not change.
    pub fn set_analysis_range(&mut self, range: TimeRange) -> bool {
        if self.analysis_range == range {
            return false;
        }
        self.analysis_range = range;
        true
    }
}
