//! WebSocket playback feed.
//!
//! # Responsibilities
//! - Validate the upgrade request
//! - Push the current track on connect, then every change
//! - Keep the connection alive with periodic pings
//!
//! # Design Decisions
//! - Connections subscribe to the shared poller; none query Spotify
//! - Slow clients only ever see the latest snapshot
//! - Server shutdown closes every connection with a Close frame

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time;

use crate::http::server::AppState;
use crate::playback::{TrackChange, TrackUpdate};

/// `GET /api/ws/spotify-current-playing`.
pub async fn feed_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match upgrade {
        Ok(ws) => ws.on_upgrade(move |socket| serve_feed(socket, addr, state)),
        Err(rejection) => {
            tracing::debug!(addr = %addr, reason = %rejection, "Rejected non-websocket request");
            (StatusCode::BAD_REQUEST, "Not a websocket request").into_response()
        }
    }
}

fn encode(update: Option<&TrackUpdate>) -> Option<Message> {
    match serde_json::to_string(&TrackChange::from_update(update)) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode track update");
            None
        }
    }
}

async fn serve_feed(socket: WebSocket, addr: SocketAddr, state: AppState) {
    let client = state.feed.register(addr);
    let mut updates = state.feed.subscribe();
    let mut shutdown = state.shutdown.subscribe();
    let (mut sender, mut receiver) = socket.split();

    let ping_period = Duration::from_secs(state.playback.ping_period_secs);
    let mut ping = time::interval_at(time::Instant::now() + ping_period, ping_period);

    // Current value first
    let initial = encode(updates.borrow_and_update().as_ref());
    if let Some(message) = initial {
        if sender.send(message).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    // Poller gone
                    break;
                }
                let message = encode(updates.borrow_and_update().as_ref());
                if let Some(message) = message {
                    if let Err(e) = sender.send(message).await {
                        tracing::debug!(client_id = %client.id(), error = %e, "Send update error");
                        break;
                    }
                }
            }
            _ = ping.tick() => {
                if sender.send(Message::Ping(Default::default())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(client_id = %client.id(), error = %e, "WebSocket receive error");
                        break;
                    }
                }
            }
            _ = shutdown.recv() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    }
}
