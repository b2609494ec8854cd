// Liaison control-plane REST client (bearer auth, {code, message, data} envelopes)

mod error;

pub use error::ApiError;

use crate::config::ApiConfig;
use crate::models::{
    Application, ApplicationList, Device, DeviceList, Edge, EdgeList, Envelope, TrafficMetricList,
    TrafficSample,
};
use crate::traffic::LOCAL_TIME_FORMAT;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

pub const DEVICES_PATH: &str = "/api/v1/devices";
pub const APPLICATIONS_PATH: &str = "/api/v1/applications";
pub const EDGES_PATH: &str = "/api/v1/edges";
pub const TRAFFIC_METRICS_PATH: &str = "/api/v1/traffic_metrics";

pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    page_size: u32,
    http: Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            page_size: config.page_size,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut req = self.http.get(self.url(path)).query(query);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        open_envelope(envelope, path)
    }

    fn page_query(&self) -> [(&'static str, String); 1] {
        [("page_size", self.page_size.to_string())]
    }

    #[instrument(skip(self), fields(api = "liaison", operation = "list_devices"))]
    pub async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        let list: DeviceList = self.get(DEVICES_PATH, &self.page_query()).await?;
        Ok(list.devices)
    }

    #[instrument(skip(self), fields(api = "liaison", operation = "list_applications"))]
    pub async fn list_applications(&self) -> Result<Vec<Application>, ApiError> {
        let list: ApplicationList = self.get(APPLICATIONS_PATH, &self.page_query()).await?;
        Ok(list.applications)
    }

    #[instrument(skip(self), fields(api = "liaison", operation = "list_edges"))]
    pub async fn list_edges(&self) -> Result<Vec<Edge>, ApiError> {
        let list: EdgeList = self.get(EDGES_PATH, &self.page_query()).await?;
        Ok(list.edges)
    }

    /// Raw per-minute samples in `[start, end]`; bounds are sent as local time without zone.
    #[instrument(skip(self), fields(api = "liaison", operation = "list_traffic_metrics"))]
    pub async fn list_traffic_metrics(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        limit: u32,
    ) -> Result<Vec<TrafficSample>, ApiError> {
        let query = [
            ("start_time", start.format(LOCAL_TIME_FORMAT).to_string()),
            ("end_time", end.format(LOCAL_TIME_FORMAT).to_string()),
            ("limit", limit.to_string()),
        ];
        let list: TrafficMetricList = self.get(TRAFFIC_METRICS_PATH, &query).await?;
        Ok(list.metrics)
    }
}

fn open_envelope<T>(envelope: Envelope<T>, path: &str) -> Result<T, ApiError> {
    if envelope.code == Some(401) {
        return Err(ApiError::Unauthorized);
    }
    if !envelope.is_success() {
        let message = if envelope.message.is_empty() {
            "request failed".to_string()
        } else {
            envelope.message
        };
        return Err(ApiError::Api {
            code: envelope.code,
            message,
        });
    }
    envelope
        .data
        .ok_or_else(|| ApiError::MissingData(path.to_string()))
}
