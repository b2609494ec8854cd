// GET handlers: version, breakdowns, traffic

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use super::AppState;
use crate::breakdown::load_breakdowns;

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/dashboard/breakdowns: fetched fresh per request; failed lists come back empty.
pub(super) async fn breakdowns_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(load_breakdowns(&state.api).await)
}

/// GET /api/dashboard/traffic: latest series from the poller, 503 until the first success.
pub(super) async fn traffic_handler(State(state): State<AppState>) -> axum::response::Response {
    let latest = state.latest_traffic.borrow().clone();
    match latest {
        Some(snapshot) => axum::Json(snapshot).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            axum::Json(serde_json::json!({ "error": "traffic series not available yet" })),
        )
            .into_response(),
    }
}
