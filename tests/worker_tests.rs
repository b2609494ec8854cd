// Worker tests: one poll cycle end-to-end, stale-on-failure, cancellation

mod common;

use chrono::{Local, TimeDelta};
use common::{at, client, mount_ok, mount_status, ok};
use liaison_dashboard::api_client::{APPLICATIONS_PATH, ApiError, TRAFFIC_METRICS_PATH};
use liaison_dashboard::traffic::BUCKET_COUNT;
use liaison_dashboard::worker::{WorkerConfig, WorkerDeps, poll_once, spawn};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, watch};
use tokio::time::{Duration, timeout};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_applications(server: &MockServer) {
    mount_ok(
        server,
        APPLICATIONS_PATH,
        json!({"applications": [
            {"id": 1, "name": "web-portal", "application_type": "web"},
            {"id": 2, "name": "ssh-bastion", "application_type": "ssh"},
        ]}),
    )
    .await;
}

#[tokio::test]
async fn poll_once_builds_full_grid() {
    let server = MockServer::start().await;
    mount_applications(&server).await;
    mount_ok(
        &server,
        TRAFFIC_METRICS_PATH,
        json!({"metrics": [
            {"timestamp": "2024-06-01T10:03:00", "application_id": 1, "bytes_in": 600, "bytes_out": 0},
            {"timestamp": "2024-06-01T10:07:00", "application_id": 1, "bytes_in": 600, "bytes_out": 0},
        ]}),
    )
    .await;

    let series = poll_once(&client(&server), at(2024, 6, 1, 12, 0, 0), 10_000)
        .await
        .unwrap();
    assert_eq!(series.points.len(), BUCKET_COUNT * 2);
    assert_eq!(series.applications, vec!["web-portal", "ssh-bastion"]);
    let p = series
        .points
        .iter()
        .find(|p| p.time == "06-01 10:00" && p.application_id == 1)
        .unwrap();
    assert_eq!(p.bytes_in, 600);
}

#[tokio::test]
async fn poll_once_fails_when_metrics_fail() {
    let server = MockServer::start().await;
    mount_applications(&server).await;
    mount_status(&server, TRAFFIC_METRICS_PATH, 500).await;

    let err = poll_once(&client(&server), at(2024, 6, 1, 12, 0, 0), 10_000)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

struct Harness {
    latest_rx: watch::Receiver<Option<liaison_dashboard::models::TrafficSnapshot>>,
    broadcast_rx: broadcast::Receiver<liaison_dashboard::models::TrafficSnapshot>,
    cancel: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
}

fn start_worker(server: &MockServer, traffic_interval_secs: u64) -> Harness {
    let (tx, broadcast_rx) = broadcast::channel(4);
    let (latest_tx, latest_rx) = watch::channel(None);
    let cancel = CancellationToken::new();
    let deps = WorkerDeps {
        api: Arc::new(client(server)),
        latest_tx,
        tx,
        ws_traffic_connections: Arc::new(AtomicUsize::new(0)),
        cancel: cancel.clone(),
    };
    let config = WorkerConfig {
        traffic_interval_secs,
        metrics_limit: 10_000,
        stats_log_interval_secs: 3600,
    };
    Harness {
        latest_rx,
        broadcast_rx,
        cancel,
        handle: spawn(deps, config),
    }
}

#[tokio::test]
async fn worker_publishes_first_series_immediately() {
    let server = MockServer::start().await;
    mount_applications(&server).await;
    let recent = (Local::now().naive_local() - TimeDelta::minutes(30))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    mount_ok(
        &server,
        TRAFFIC_METRICS_PATH,
        json!({"metrics": [
            {"timestamp": recent, "application_id": 2, "bytes_in": 300, "bytes_out": 60},
        ]}),
    )
    .await;

    let mut h = start_worker(&server, 3600);
    timeout(Duration::from_secs(5), h.latest_rx.changed())
        .await
        .expect("worker should publish within 5s")
        .unwrap();

    let snapshot = h.latest_rx.borrow().clone().unwrap();
    assert_eq!(snapshot.series.points.len(), BUCKET_COUNT * 2);
    assert!(snapshot.timestamp > 0);
    let total_in: u64 = snapshot.series.points.iter().map(|p| p.bytes_in).sum();
    assert_eq!(total_in, 300);

    let broadcast = h.broadcast_rx.recv().await.unwrap();
    assert_eq!(broadcast, snapshot);

    h.cancel.cancel();
    timeout(Duration::from_secs(5), h.handle)
        .await
        .expect("worker should stop after cancel")
        .unwrap();
}

#[tokio::test]
async fn failed_poll_publishes_nothing() {
    let server = MockServer::start().await;
    mount_status(&server, APPLICATIONS_PATH, 503).await;
    mount_ok(&server, TRAFFIC_METRICS_PATH, json!({"metrics": []})).await;

    let h = start_worker(&server, 3600);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(h.latest_rx.borrow().is_none());

    h.cancel.cancel();
    timeout(Duration::from_secs(5), h.handle)
        .await
        .expect("worker should stop after cancel")
        .unwrap();
}

#[tokio::test]
async fn cancel_before_start_stops_worker() {
    let server = MockServer::start().await;
    let h = start_worker(&server, 3600);
    h.cancel.cancel();
    timeout(Duration::from_secs(5), h.handle)
        .await
        .expect("worker should stop after cancel")
        .unwrap();
}

#[tokio::test]
async fn failed_poll_keeps_previous_series_published() {
    let server = MockServer::start().await;
    mount_applications(&server).await;
    let recent = (Local::now().naive_local() - TimeDelta::minutes(30))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    Mock::given(method("GET"))
        .and(path(TRAFFIC_METRICS_PATH))
        .respond_with(ok(json!({"metrics": [
            {"timestamp": recent, "application_id": 1, "bytes_in": 900, "bytes_out": 0},
        ]})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TRAFFIC_METRICS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut h = start_worker(&server, 1);
    timeout(Duration::from_secs(5), h.latest_rx.changed())
        .await
        .expect("first poll should publish")
        .unwrap();
    let first = h.latest_rx.borrow_and_update().clone().unwrap();

    // Let at least one failing cycle run.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    let metric_calls = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == TRAFFIC_METRICS_PATH)
        .count();
    assert!(metric_calls >= 2, "expected a failed cycle, saw {metric_calls} calls");

    assert!(!h.latest_rx.has_changed().unwrap());
    assert_eq!(h.latest_rx.borrow().clone(), Some(first));

    h.cancel.cancel();
    timeout(Duration::from_secs(5), h.handle)
        .await
        .expect("worker should stop after cancel")
        .unwrap();
}
