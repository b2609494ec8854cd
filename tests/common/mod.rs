// Shared test helpers: fixtures and a wiremock control-plane
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use liaison_dashboard::api_client::ApiClient;
use liaison_dashboard::config::ApiConfig;
use liaison_dashboard::models::{Application, TrafficSample};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

pub fn sample(timestamp: &str, application_id: u64, bytes_in: u64, bytes_out: u64) -> TrafficSample {
    TrafficSample {
        timestamp: timestamp.to_string(),
        application_id,
        bytes_in,
        bytes_out,
    }
}

pub fn application(id: u64, name: &str, application_type: &str) -> Application {
    Application {
        id,
        name: name.to_string(),
        application_type: application_type.to_string(),
    }
}

pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        token: Some(TEST_TOKEN.to_string()),
        request_timeout_secs: 5,
        page_size: 1000,
    }
}

pub fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&api_config(&server.uri())).unwrap()
}

/// `{code: 200, message: "success", data}` response.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 200,
        "message": "success",
        "data": data,
    }))
}

pub async fn mount_ok(server: &MockServer, route: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ok(data))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
