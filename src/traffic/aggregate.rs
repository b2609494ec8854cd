// Pure aggregation: samples -> per-(bucket, application) totals -> complete mean grid.
// DB-free and clock-free; the poller supplies the window and the application list.

use std::collections::HashMap;

use tracing::warn;

use super::bucket::{BUCKET_MINUTES, align_to_bucket};
use super::timestamp::parse_sample_timestamp;
use crate::models::{
    AggregatedPoint, Application, BucketKey, TimeBucket, TrafficSample, TrafficSeries,
};

/// Seconds covered by one upstream sample (samples are recorded per minute).
const SAMPLE_INTERVAL_SECS: f64 = 60.0;

/// Running sums for one (bucket, application) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub count: u64,
}

/// Totals keyed by window position, then application id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulation {
    pub buckets: Vec<HashMap<u64, Totals>>,
    /// Samples whose timestamp could not be parsed.
    pub skipped: usize,
    /// Samples that fell outside the window.
    pub out_of_window: usize,
}

impl Accumulation {
    pub fn get(&self, bucket_index: usize, application_id: u64) -> Totals {
        self.buckets
            .get(bucket_index)
            .and_then(|m| m.get(&application_id))
            .copied()
            .unwrap_or_default()
    }
}

/// Assigns every sample to its 10-minute slot and sums bytes per application.
/// Unparseable samples are skipped with a warning; samples outside the window are dropped.
pub fn accumulate(samples: &[TrafficSample], window: &[TimeBucket]) -> Accumulation {
    let index: HashMap<BucketKey, usize> =
        window.iter().enumerate().map(|(i, b)| (b.key, i)).collect();

    let mut acc = Accumulation {
        buckets: vec![HashMap::new(); window.len()],
        ..Default::default()
    };

    for sample in samples {
        let t = match parse_sample_timestamp(&sample.timestamp) {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    error = %e,
                    application_id = sample.application_id,
                    operation = "accumulate",
                    "skipping traffic sample"
                );
                acc.skipped += 1;
                continue;
            }
        };
        let key = BucketKey::from(align_to_bucket(t));
        let Some(&i) = index.get(&key) else {
            acc.out_of_window += 1;
            continue;
        };
        let totals = acc.buckets[i].entry(sample.application_id).or_default();
        totals.bytes_in = totals.bytes_in.saturating_add(sample.bytes_in);
        totals.bytes_out = totals.bytes_out.saturating_add(sample.bytes_out);
        totals.count += 1;
    }

    acc
}

/// Emits exactly one point per (bucket, application): the rounded per-sample mean, or 0.
pub fn normalize(
    acc: &Accumulation,
    window: &[TimeBucket],
    applications: &[Application],
) -> TrafficSeries {
    let buckets: Vec<String> = window.iter().map(TimeBucket::label).collect();
    let mut points = Vec::with_capacity(window.len() * applications.len());

    for (i, label) in buckets.iter().enumerate() {
        for app in applications {
            let totals = acc.get(i, app.id);
            let bytes_in = mean(totals.bytes_in, totals.count);
            let bytes_out = mean(totals.bytes_out, totals.count);
            points.push(AggregatedPoint {
                time: label.clone(),
                application_id: app.id,
                application: app.name.clone(),
                bytes_in,
                bytes_out,
                in_bps: bytes_to_bps(bytes_in),
                out_bps: bytes_to_bps(bytes_out),
            });
        }
    }

    TrafficSeries {
        bucket_minutes: BUCKET_MINUTES,
        buckets,
        applications: applications.iter().map(|a| a.name.clone()).collect(),
        points,
    }
}

/// accumulate + normalize. Pure: same inputs, same series.
pub fn aggregate(
    samples: &[TrafficSample],
    window: &[TimeBucket],
    applications: &[Application],
) -> TrafficSeries {
    let acc = accumulate(samples, window);
    if acc.skipped > 0 || acc.out_of_window > 0 {
        tracing::debug!(
            samples = samples.len(),
            skipped = acc.skipped,
            out_of_window = acc.out_of_window,
            "traffic samples not placed in the window"
        );
    }
    normalize(&acc, window, applications)
}

/// Bits per second for a byte count covering one sample interval.
pub fn bytes_to_bps(bytes: u64) -> f64 {
    bytes as f64 * 8.0 / SAMPLE_INTERVAL_SECS
}

fn mean(sum: u64, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u64
}
