// Sample timestamp parsing into local wall-clock time.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Format used for bare local timestamps, both in samples and in query parameters.
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("unparseable zoned timestamp {0:?}")]
    Zoned(String),
    #[error("timestamp {0:?} does not split into YYYY-MM-DD and HH:mm:ss")]
    Shape(String),
    #[error("timestamp {0:?} has out-of-range fields")]
    Range(String),
}

/// Parses a sample timestamp to local wall-clock time.
///
/// Strings carrying `+`, `Z`, or longer than `YYYY-MM-DDTHH:mm:ss` go through RFC 3339
/// and are shifted into the local zone. Bare strings are read field by field as local
/// time, so they are never reinterpreted through UTC.
pub fn parse_sample_timestamp(s: &str) -> Result<NaiveDateTime, TimestampError> {
    let s = s.trim();
    if is_extended(s) {
        parse_extended(s)
    } else {
        parse_bare(s)
    }
}

fn is_extended(s: &str) -> bool {
    s.contains('+') || s.contains('Z') || (s.len() > 19 && s.contains('T'))
}

fn parse_extended(s: &str) -> Result<NaiveDateTime, TimestampError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    // Fractional seconds without an offset: still local wall-clock time.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|_| TimestampError::Zoned(s.to_string()))
}

fn parse_bare(s: &str) -> Result<NaiveDateTime, TimestampError> {
    let shape = || TimestampError::Shape(s.to_string());
    let (date, time) = s.split_once('T').ok_or_else(shape)?;

    let date: Vec<&str> = date.split('-').collect();
    let time: Vec<&str> = time.split(':').collect();
    if date.len() != 3 || !(2..=3).contains(&time.len()) {
        return Err(shape());
    }

    let year: i32 = date[0].parse().map_err(|_| shape())?;
    let month: u32 = date[1].parse().map_err(|_| shape())?;
    let day: u32 = date[2].parse().map_err(|_| shape())?;
    let hour: u32 = time[0].parse().map_err(|_| shape())?;
    let minute: u32 = time[1].parse().map_err(|_| shape())?;
    let second: u32 = match time.get(2) {
        Some(sec) => sec.parse().map_err(|_| shape())?,
        None => 0,
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or_else(|| TimestampError::Range(s.to_string()))
}
