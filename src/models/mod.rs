// Domain models: control-plane wire types, traffic grid, breakdowns

mod api;
mod breakdown;
pub mod coerce;
mod traffic;

pub use api::{
    Application, ApplicationList, Device, DeviceList, Edge, EdgeList, Envelope, TrafficMetricList,
    TrafficSample,
};
pub use breakdown::{Breakdown, Breakdowns, CategoryCount, OsFamily};
pub use traffic::{AggregatedPoint, BucketKey, TimeBucket, TrafficSeries, TrafficSnapshot};
