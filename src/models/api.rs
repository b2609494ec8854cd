// Control-plane wire types: response envelope and the list payloads the dashboard reads.

use serde::{Deserialize, Serialize};

use super::coerce;

/// `{code, message, data}` wrapper shared by every control-plane endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Missing code is a failure, never an implicit success.
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Some endpoints answer 0 instead of 200 on success.
    pub fn is_success(&self) -> bool {
        matches!(self.code, Some(200) | Some(0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "coerce::uint")]
    pub id: u64,
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub os: String,
}

/// Also serves as the series label source for the traffic grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    #[serde(default, deserialize_with = "coerce::uint")]
    pub id: u64,
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub application_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, deserialize_with = "coerce::uint")]
    pub id: u64,
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    /// 1 = online, 2 = offline.
    #[serde(default, deserialize_with = "coerce::uint")]
    pub online: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficSample {
    #[serde(default, deserialize_with = "coerce::string")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "coerce::uint")]
    pub application_id: u64,
    #[serde(default, deserialize_with = "coerce::uint")]
    pub bytes_in: u64,
    #[serde(default, deserialize_with = "coerce::uint")]
    pub bytes_out: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceList {
    #[serde(default, deserialize_with = "coerce::list")]
    pub devices: Vec<Device>,
    #[serde(default, deserialize_with = "coerce::uint")]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationList {
    #[serde(default, deserialize_with = "coerce::list")]
    pub applications: Vec<Application>,
    #[serde(default, deserialize_with = "coerce::uint")]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeList {
    #[serde(default, deserialize_with = "coerce::list")]
    pub edges: Vec<Edge>,
    #[serde(default, deserialize_with = "coerce::uint")]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrafficMetricList {
    #[serde(default, deserialize_with = "coerce::list")]
    pub metrics: Vec<TrafficSample>,
}
