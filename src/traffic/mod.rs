// Traffic grid: bucket window, timestamp parsing, aggregation.

pub mod aggregate;
pub mod bucket;
pub mod timestamp;

pub use aggregate::{Accumulation, Totals, accumulate, aggregate, bytes_to_bps, normalize};
pub use bucket::{BUCKET_COUNT, BUCKET_MINUTES, align_to_bucket, bucket_window};
pub use timestamp::{LOCAL_TIME_FORMAT, TimestampError, parse_sample_timestamp};
