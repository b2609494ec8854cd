// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, watch};
use tower_http::cors::{Any, CorsLayer};

use crate::api_client::ApiClient;
use crate::models::TrafficSnapshot;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: Arc<ApiClient>,
    pub(crate) traffic_tx: broadcast::Sender<TrafficSnapshot>,
    pub(crate) latest_traffic: watch::Receiver<Option<TrafficSnapshot>>,
    pub(crate) ws_traffic_connections: Arc<AtomicUsize>,
}

pub fn app(
    api: Arc<ApiClient>,
    traffic_tx: broadcast::Sender<TrafficSnapshot>,
    latest_traffic: watch::Receiver<Option<TrafficSnapshot>>,
    ws_traffic_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        api,
        traffic_tx,
        latest_traffic,
        ws_traffic_connections,
    };
    Router::new()
        .route("/", get(|| async { "Liaison dashboard" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/dashboard/breakdowns", get(http::breakdowns_handler)) // GET /api/dashboard/breakdowns
        .route("/api/dashboard/traffic", get(http::traffic_handler)) // GET /api/dashboard/traffic
        .route("/ws/traffic", get(ws::ws_traffic)) // WS /ws/traffic
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
