// Time window tests: 144 ten-minute slots ending at "now" aligned down

mod common;

use chrono::{TimeDelta, Timelike};
use common::at;
use liaison_dashboard::traffic::{BUCKET_COUNT, align_to_bucket, bucket_window};
use std::collections::HashSet;

fn assert_window_shape(now: chrono::NaiveDateTime) {
    let window = bucket_window(now);
    assert_eq!(window.len(), BUCKET_COUNT);
    for pair in window.windows(2) {
        assert_eq!(pair[1].start - pair[0].start, TimeDelta::minutes(10));
    }
    let last = window.last().unwrap();
    assert_eq!(last.start.minute() % 10, 0);
    assert!(last.start.minute() <= now.minute());
    assert_eq!(last.start.second(), 0);
    assert!(last.start <= now);
    assert!(now - last.start < TimeDelta::minutes(10));
}

#[test]
fn window_has_144_increasing_slots_for_many_nows() {
    for now in [
        at(2024, 6, 1, 12, 0, 0),
        at(2024, 6, 1, 12, 9, 59),
        at(2024, 6, 1, 0, 3, 17),
        at(2024, 3, 1, 0, 5, 0),
        at(2024, 12, 31, 23, 59, 59),
    ] {
        assert_window_shape(now);
    }
}

#[test]
fn window_spans_trailing_24_hours() {
    let window = bucket_window(at(2024, 6, 1, 12, 34, 56));
    assert_eq!(window.first().unwrap().start, at(2024, 5, 31, 12, 40, 0));
    assert_eq!(window.last().unwrap().start, at(2024, 6, 1, 12, 30, 0));
    assert_eq!(window.last().unwrap().label(), "06-01 12:30");
}

#[test]
fn window_crosses_month_and_leap_day() {
    let window = bucket_window(at(2024, 3, 1, 0, 5, 0));
    assert_eq!(window.first().unwrap().start, at(2024, 2, 29, 0, 10, 0));
    assert_eq!(window.first().unwrap().label(), "02-29 00:10");
}

#[test]
fn window_keys_are_unique() {
    let window = bucket_window(at(2024, 6, 1, 12, 0, 0));
    let keys: HashSet<_> = window.iter().map(|b| b.key).collect();
    assert_eq!(keys.len(), BUCKET_COUNT);
}

#[test]
fn window_is_deterministic_and_slides() {
    let now = at(2024, 6, 1, 12, 0, 0);
    assert_eq!(bucket_window(now), bucket_window(now));

    let later = bucket_window(now + TimeDelta::minutes(10));
    let earlier = bucket_window(now);
    assert_eq!(later[0], earlier[1]);
    assert_eq!(later[BUCKET_COUNT - 2], earlier[BUCKET_COUNT - 1]);
}

#[test]
fn align_drops_sub_minute_remainder() {
    let t = at(2024, 6, 1, 10, 59, 59) + TimeDelta::milliseconds(999);
    assert_eq!(align_to_bucket(t), at(2024, 6, 1, 10, 50, 0));
}
