// Background traffic poller.
// One cycle on start, then every traffic_interval_secs; each cycle rebuilds the
// whole series and replaces the published one. Stops when the token is cancelled.

use crate::api_client::{ApiClient, ApiError};
use crate::models::{TrafficSeries, TrafficSnapshot};
use crate::traffic::{aggregate, bucket_window};
use chrono::{NaiveDateTime, TimeDelta};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{broadcast, watch};
use tokio::time::{Duration, Instant, interval};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Rate limit for "no receivers" log (avoid logging every poll when no one is on /ws/traffic)
const NO_RECEIVERS_LOG_INTERVAL: Duration = Duration::from_secs(300);

/// Trailing window requested from the metrics endpoint.
pub const TRAFFIC_WINDOW_HOURS: i64 = 24;

/// Client, channels, and cancellation for the poller.
pub struct WorkerDeps {
    pub api: Arc<ApiClient>,
    /// Latest successful series (read by GET /api/dashboard/traffic and new WS clients).
    pub latest_tx: watch::Sender<Option<TrafficSnapshot>>,
    pub tx: broadcast::Sender<TrafficSnapshot>,
    pub ws_traffic_connections: Arc<AtomicUsize>,
    pub cancel: CancellationToken,
}

pub struct WorkerConfig {
    pub traffic_interval_secs: u64,
    pub metrics_limit: u32,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Fetches applications and samples concurrently and builds the grid ending at `now`.
pub async fn poll_once(
    api: &ApiClient,
    now: NaiveDateTime,
    metrics_limit: u32,
) -> Result<TrafficSeries, ApiError> {
    let (applications, samples) = tokio::try_join!(
        api.list_applications(),
        api.list_traffic_metrics(
            now - TimeDelta::hours(TRAFFIC_WINDOW_HOURS),
            now,
            metrics_limit,
        ),
    )?;
    let window = bucket_window(now);
    Ok(aggregate(&samples, &window, &applications))
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        api,
        latest_tx,
        tx,
        ws_traffic_connections,
        cancel,
    } = deps;
    let WorkerConfig {
        traffic_interval_secs,
        metrics_limit,
        stats_log_interval_secs,
    } = config;

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", traffic_interval_secs);
    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_secs(traffic_interval_secs));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            let mut polls_ok: u64 = 0;
            let mut polls_failed: u64 = 0;
            let mut last_no_receivers_log: Option<Instant> = None;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("Traffic poller shutting down");
                        break;
                    }
                    _ = tick.tick() => {
                        let now = chrono::Local::now().naive_local();
                        let series = tokio::select! {
                            _ = cancel.cancelled() => {
                                tracing::debug!("Traffic poller cancelled mid-cycle");
                                break;
                            }
                            r = poll_once(&api, now, metrics_limit) => r,
                        };
                        let series = match series {
                            Ok(s) => s,
                            Err(e) => {
                                // Previous series stays published until the next tick.
                                polls_failed += 1;
                                tracing::warn!(
                                    error = %e,
                                    operation = "poll_traffic",
                                    "traffic poll failed"
                                );
                                continue;
                            }
                        };
                        polls_ok += 1;

                        let snapshot = TrafficSnapshot {
                            timestamp: now_millis(),
                            series,
                        };
                        tracing::debug!(
                            operation = "poll_traffic",
                            points = snapshot.series.points.len(),
                            applications = snapshot.series.applications.len(),
                            "Traffic series rebuilt"
                        );
                        latest_tx.send_replace(Some(snapshot.clone()));
                        if tx.send(snapshot).is_err() {
                            let should_log = last_no_receivers_log
                                .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_LOG_INTERVAL);
                            if should_log {
                                tracing::debug!(
                                    operation = "broadcast_traffic",
                                    "No active WebSocket clients; broadcast channel has no receivers"
                                );
                                last_no_receivers_log = Some(Instant::now());
                            }
                        }
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            ws_traffic_clients = ws_traffic_connections.load(Ordering::Relaxed),
                            polls_ok,
                            polls_failed,
                            "app stats"
                        );
                    }
                }
            }
        }
        .instrument(worker_span),
    )
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}
