//! API and view handlers.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::http::request_id;
use crate::http::response::{error_response, ApiResponse};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::playback::TrackUpdate;
use crate::routing::RoutingError;
use crate::spotify::SpotifyError;

/// `GET /api/login`: redirect to the Spotify consent screen.
pub async fn login(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let response = match state.spotify.auth().auth_url() {
        Ok(url) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build authorization URL");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "auth_url_failed", e.to_string())
        }
    };
    metrics::record_request("login", response.status().as_u16(), start);
    response
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
}

/// `GET /api/spotify-callback`: exchange the authorization code.
pub async fn spotify_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let start = Instant::now();
    let response = exchange_code(&state, params).await;
    metrics::record_request("callback", response.status().as_u16(), start);
    response
}

async fn exchange_code(state: &AppState, params: CallbackParams) -> Response {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "Authorization denied");
        return error_response(StatusCode::BAD_REQUEST, "authorization_denied", error);
    }

    let (oauth_state, code) = match (params.state, params.code) {
        (Some(s), Some(c)) if !s.is_empty() && !c.is_empty() => (s, c),
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "Missing state or code parameter",
            )
        }
    };

    match state.spotify.auth().exchange(&oauth_state, &code).await {
        Ok(token) => {
            let body = ApiResponse {
                access_token: Some(token.access_token.clone()),
                token_type: Some(token.token_type.clone()),
                expires_in: Some(token.expires_in()),
                scope: Some(token.scope.clone()),
                ..ApiResponse::success()
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Token exchange failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_exchange_failed",
                e.to_string(),
            )
        }
    }
}

/// `GET /api/spotify-current-playing`: the track playing right now.
pub async fn current_playing(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let response = fetch_current(&state).await;
    metrics::record_request("current_playing", response.status().as_u16(), start);
    response
}

async fn fetch_current(state: &AppState) -> Response {
    if state.spotify.auth().token().is_none() {
        return error_response(StatusCode::UNAUTHORIZED, "no_token", "No access token available");
    }

    let playback = match state.spotify.current_track_refreshing().await {
        Ok(playback) => playback,
        Err(SpotifyError::NoToken) => {
            return error_response(StatusCode::UNAUTHORIZED, "no_token", "No access token available")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Current track fetch failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "track_fetch_failed",
                e.to_string(),
            );
        }
    };

    match playback.as_ref().and_then(TrackUpdate::from_playback) {
        Some(update) => Json(update).into_response(),
        None => error_response(
            StatusCode::OK,
            "no_track_playing",
            "No track is currently playing",
        ),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub authenticated: bool,
    pub feed_clients: usize,
    /// Name of the track the poller last saw playing.
    pub now_playing: Option<String>,
    pub routes: Vec<String>,
}

/// `GET /api/health`: liveness plus a few counters.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "operational".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        authenticated: state.spotify.auth().token().is_some(),
        feed_clients: state.feed.client_count(),
        now_playing: state.feed.latest().map(|track| track.name),
        routes: state.router.routes().map(|r| r.name().to_string()).collect(),
    })
}

/// Fallback: serve the view the app router resolves for this path.
pub async fn view(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let start = Instant::now();
    let response = if method != Method::GET && method != Method::HEAD {
        error_response(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", "Views are read-only")
    } else {
        match state.router.load(uri.path()).await {
            Ok(view) => Html(view.body).into_response(),
            Err(RoutingError::NotFound(path)) => {
                tracing::debug!(request_id = %request_id(&headers), path = %path, "No route matched");
                error_response(StatusCode::NOT_FOUND, "not_found", format!("No route matches '{}'", path))
            }
            Err(e) => {
                tracing::error!(request_id = %request_id(&headers), error = %e, "View failed to load");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "view_load_failed", e.to_string())
            }
        }
    };
    metrics::record_request("view", response.status().as_u16(), start);
    response
}
