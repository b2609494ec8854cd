use anyhow::Result;
use liaison_dashboard::*;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    if app_config.api.token.is_none() {
        tracing::warn!(
            "No API token configured (set api.token or {}); requests will be unauthenticated",
            config::TOKEN_ENV
        );
    }

    let api = Arc::new(
        api_client::ApiClient::new(&app_config.api)
            .map_err(|e| anyhow::anyhow!("api client: {}", e))?,
    );
    let (tx, _) = broadcast::channel::<models::TrafficSnapshot>(
        app_config.publishing.broadcast_capacity,
    );
    let (latest_tx, latest_rx) = watch::channel::<Option<models::TrafficSnapshot>>(None);
    let ws_traffic_connections = Arc::new(AtomicUsize::new(0));
    let cancel = CancellationToken::new();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            api: api.clone(),
            latest_tx,
            tx: tx.clone(),
            ws_traffic_connections: ws_traffic_connections.clone(),
            cancel: cancel.clone(),
        },
        worker::WorkerConfig {
            traffic_interval_secs: app_config.polling.traffic_interval_secs,
            metrics_limit: app_config.polling.metrics_limit,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let app = routes::app(api, tx, latest_rx, ws_traffic_connections);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        upstream = %app_config.api.base_url,
        "Listening on http://{}",
        addr
    );

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
        }
    }

    cancel.cancel();
    let _ = worker_handle.await;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
