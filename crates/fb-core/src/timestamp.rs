//! Time-of-day normalization.
//!
//! Log lines carry only `HH:MM:SS`. Every line of a run is anchored to one
//! reference date, so equal times of day always map to equal timestamps.
//! Logs that cross midnight are not supported.

use chrono::{Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use thiserror::Error;

/// Seconds since the Unix epoch.
pub type Timestamp = i64;

/// Format of the time-of-day field.
const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("invalid time of day: {0:?}, expected HH:MM:SS")]
    InvalidTime(String),
}

/// Converts `HH:MM:SS` strings to epoch seconds on a fixed local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    date: NaiveDate,
}

impl Normalizer {
    /// Anchors to today's local date, captured once.
    pub fn today() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub const fn for_date(date: NaiveDate) -> Self {
        Self { date }
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Normalizes a time of day to epoch seconds on the reference date.
    pub fn normalize(&self, hhmmss: &str) -> Result<Timestamp, TimestampError> {
        let time = NaiveTime::parse_from_str(hhmmss, TIME_FORMAT)
            .map_err(|_| TimestampError::InvalidTime(hhmmss.to_string()))?;
        Ok(local_to_epoch(&Local, self.date.and_time(time)))
    }
}

/// Resolves a naive wall-clock datetime in `tz` to epoch seconds.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// spring-forward gap are read with the offset in effect before the jump,
/// which is the instant one hour later on the wall clock.
fn local_to_epoch<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Timestamp {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp(),
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .map_or_else(|| naive.and_utc().timestamp(), |dt| dt.timestamp())
        }
    }
}
