//! Shared utilities for integration testing.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use song_overlay::config::OverlayConfig;
use song_overlay::http::AppState;
use song_overlay::{HttpServer, Shutdown};

pub const MOCK_ACCESS_TOKEN: &str = "mock-access";

/// What the mock player endpoint answers with.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockPlayback {
    Playing { name: &'static str, artists: Vec<&'static str>, album: &'static str },
    Nothing,
    Status(u16),
}

#[derive(Clone)]
struct MockState {
    playback: Arc<Mutex<MockPlayback>>,
    token_requests: Arc<AtomicU32>,
    player_requests: Arc<AtomicU32>,
}

/// A mock of the Spotify accounts service and Web API on one port.
#[allow(dead_code)]
pub struct MockSpotify {
    pub addr: SocketAddr,
    playback: Arc<Mutex<MockPlayback>>,
    token_requests: Arc<AtomicU32>,
    player_requests: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl MockSpotify {
    pub fn set_playback(&self, playback: MockPlayback) {
        *self.playback.lock().unwrap() = playback;
    }

    pub fn token_requests(&self) -> u32 {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn player_requests(&self) -> u32 {
        self.player_requests.load(Ordering::SeqCst)
    }
}

/// Start the mock on an ephemeral port.
pub async fn start_mock_spotify(initial: MockPlayback) -> MockSpotify {
    let state = MockState {
        playback: Arc::new(Mutex::new(initial)),
        token_requests: Arc::new(AtomicU32::new(0)),
        player_requests: Arc::new(AtomicU32::new(0)),
    };

    let app = Router::new()
        .route("/api/token", post(mock_token))
        .route("/v1/me/player/currently-playing", get(mock_player))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockSpotify {
        addr,
        playback: state.playback,
        token_requests: state.token_requests,
        player_requests: state.player_requests,
    }
}

async fn mock_token(
    State(state): State<MockState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);

    let valid = match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") => form.get("code").map(|c| c != "bad").unwrap_or(false),
        Some("refresh_token") => form.contains_key("refresh_token"),
        _ => false,
    };
    if !valid {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))).into_response();
    }

    Json(json!({
        "access_token": MOCK_ACCESS_TOKEN,
        "token_type": "Bearer",
        "scope": "user-read-currently-playing user-read-playback-state",
        "expires_in": 3600,
        "refresh_token": "mock-refresh"
    }))
    .into_response()
}

async fn mock_player(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.player_requests.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", MOCK_ACCESS_TOKEN))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": { "status": 401 } }))).into_response();
    }

    let playback = state.playback.lock().unwrap().clone();
    match playback {
        MockPlayback::Playing { name, artists, album } => Json(json!({
            "is_playing": true,
            "progress_ms": 1000,
            "currently_playing_type": "track",
            "item": {
                "id": format!("id-{}", name.to_lowercase()),
                "name": name,
                "duration_ms": 200000,
                "album": { "name": album, "images": [] },
                "artists": artists.iter().map(|a| json!({ "name": a })).collect::<Vec<_>>()
            }
        }))
        .into_response(),
        MockPlayback::Nothing => StatusCode::NO_CONTENT.into_response(),
        MockPlayback::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
    }
}

/// Config pointing the overlay at `mock`, with fast polling.
pub fn test_config(mock: &MockSpotify) -> OverlayConfig {
    let mut config = OverlayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.spotify.client_id = "test-client".into();
    config.spotify.client_secret = "test-secret".into();
    config.spotify.accounts_url = format!("http://{}", mock.addr);
    config.spotify.api_url = format!("http://{}/v1", mock.addr);
    config.playback.playing_delay_ms = 50;
    config.playback.not_playing_delay_ms = 50;
    config.playback.error_base_delay_ms = 50;
    config.playback.error_max_delay_ms = 200;
    config
}

/// A running overlay server.
#[allow(dead_code)]
pub struct RunningOverlay {
    pub addr: SocketAddr,
    pub state: AppState,
    pub shutdown: Arc<Shutdown>,
}

impl Drop for RunningOverlay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the overlay server on an ephemeral port.
pub async fn start_overlay(config: OverlayConfig) -> RunningOverlay {
    let shutdown = Arc::new(Shutdown::new());
    let server = HttpServer::new(config, shutdown.clone()).unwrap();
    let state = server.state().clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningOverlay { addr, state, shutdown }
}

/// HTTP client that does not follow redirects.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
