// Traffic series models: bucket identity and chart-ready points

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Slot identity on the 10-minute grid. Carries no year: the trailing 24h window
/// is assumed to sit inside one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketKey {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl From<NaiveDateTime> for BucketKey {
    fn from(t: NaiveDateTime) -> Self {
        Self {
            month: t.month(),
            day: t.day(),
            hour: t.hour(),
            minute: t.minute(),
        }
    }
}

/// One slot of the fixed window. `start` is already aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub start: NaiveDateTime,
    pub key: BucketKey,
}

impl TimeBucket {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            start,
            key: BucketKey::from(start),
        }
    }

    /// Axis label, e.g. "06-01 10:00".
    pub fn label(&self) -> String {
        self.start.format("%m-%d %H:%M").to_string()
    }
}

/// One cell of the (bucket x application) grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPoint {
    pub time: String,
    pub application_id: u64,
    pub application: String,
    /// Mean bytes per sample in this bucket.
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub in_bps: f64,
    pub out_bps: f64,
}

/// Complete grid for one poll: `buckets.len() * applications.len()` points,
/// bucket-major, oldest bucket first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSeries {
    pub bucket_minutes: u32,
    pub buckets: Vec<String>,
    pub applications: Vec<String>,
    pub points: Vec<AggregatedPoint>,
}

/// What the poller publishes: the series plus when it was built (ms since epoch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSnapshot {
    pub timestamp: u64,
    pub series: TrafficSeries,
}
