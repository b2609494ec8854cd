// WebSocket handler and stream logic for /ws/traffic

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{Duration, Instant, timeout};

use super::AppState;
use crate::models::TrafficSnapshot;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements ws_traffic connection count on drop (connect = +1, drop = -1).
struct WsTrafficGuard(Arc<AtomicUsize>);

impl Drop for WsTrafficGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

pub(super) async fn ws_traffic(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    // Subscribe before reading the latest series so nothing published during
    // the handshake is missed; worst case the client sees one series twice.
    let mut rx = state.traffic_tx.subscribe();
    let latest = state.latest_traffic.borrow().clone();
    let conn_count = state.ws_traffic_connections.clone();
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_traffic(socket, latest, &mut rx, conn_count).await {
            tracing::info!("Traffic stream error: {}", e);
        }
    })
}

async fn send_json(socket: &mut WebSocket, snapshot: &TrafficSnapshot) -> anyhow::Result<bool> {
    let json = serde_json::to_string(snapshot)?;
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
    Ok(matches!(r, Ok(Ok(()))))
}

async fn stream_traffic(
    mut socket: WebSocket,
    latest: Option<TrafficSnapshot>,
    rx: &mut broadcast::Receiver<TrafficSnapshot>,
    conn_count: Arc<AtomicUsize>,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, Ordering::Relaxed);
    let _guard = WsTrafficGuard(conn_count);
    tracing::info!("Client connected to Traffic stream");

    // New clients get the current series right away instead of waiting for the next poll.
    if let Some(snapshot) = latest
        && !send_json(&mut socket, &snapshot).await?
    {
        return Ok(());
    }

    let mut ping_interval =
        tokio::time::interval_at(Instant::now() + WS_PING_INTERVAL, WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                let snapshot = match result {
                    Ok(s) => s,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Traffic stream lagged; skipping to newest");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                if !send_json(&mut socket, &snapshot).await? {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if !matches!(r, Ok(Ok(()))) {
                    break;
                }
            }
        }
    }
    Ok(())
}
