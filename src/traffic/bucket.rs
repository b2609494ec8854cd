// Fixed trailing-24h window of 10-minute slots.

use chrono::{NaiveDateTime, TimeDelta, Timelike};

use crate::models::TimeBucket;

pub const BUCKET_MINUTES: u32 = 10;
/// 24h / 10 min.
pub const BUCKET_COUNT: usize = 144;

/// Truncates to the containing 10-minute boundary (seconds and sub-seconds zeroed).
pub fn align_to_bucket(t: NaiveDateTime) -> NaiveDateTime {
    let extra_minutes = t.minute() % BUCKET_MINUTES;
    t - TimeDelta::minutes(extra_minutes as i64)
        - TimeDelta::seconds(t.second() as i64)
        - TimeDelta::nanoseconds(t.nanosecond() as i64)
}

/// The 144 slots ending at `now` aligned down, oldest first. Rebuilt every poll so
/// the window slides forward.
pub fn bucket_window(now: NaiveDateTime) -> Vec<TimeBucket> {
    let last = align_to_bucket(now);
    let step = BUCKET_MINUTES as i64;
    (0..BUCKET_COUNT as i64)
        .rev()
        .map(|i| TimeBucket::new(last - TimeDelta::minutes(i * step)))
        .collect()
}
