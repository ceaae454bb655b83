//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the app router, Spotify clients and playback feed from config
//! - Create the Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Run the playback poller alongside the server
//! - Stop everything on the shutdown signal

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::config::{OverlayConfig, PlaybackConfig};
use crate::http::handlers;
use crate::http::websocket::feed_handler;
use crate::lifecycle::startup::{upstream_client, StartupError};
use crate::lifecycle::Shutdown;
use crate::observability::spans::http_trace_layer;
use crate::playback::{PlaybackFeed, PlaybackPoller, TrackUpdate};
use crate::routing::Router as AppRouter;
use crate::spotify::{Authenticator, SpotifyClient};
use crate::views;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<AppRouter>,
    pub spotify: Arc<SpotifyClient>,
    pub feed: PlaybackFeed,
    pub playback: PlaybackConfig,
    pub shutdown: Arc<Shutdown>,
}

/// HTTP server for the overlay.
pub struct HttpServer {
    router: Router,
    state: AppState,
    updates: tokio::sync::watch::Sender<Option<TrackUpdate>>,
    config: OverlayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails on an invalid route table or missing Spotify credentials.
    pub fn new(config: OverlayConfig, shutdown: Arc<Shutdown>) -> Result<Self, StartupError> {
        let app_router = Arc::new(AppRouter::configure(
            &config.app.base_url,
            config.app.history,
            views::app_routes(),
        )?);

        let http = upstream_client(&config)?;
        let auth = Arc::new(Authenticator::new(config.spotify.clone(), http.clone())?);
        let spotify = Arc::new(SpotifyClient::new(http, &config.spotify.api_url, auth));

        let (updates, feed) = PlaybackFeed::channel();

        let state = AppState {
            router: app_router,
            spotify,
            feed,
            playback: config.playback.clone(),
            shutdown,
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            state,
            updates,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &OverlayConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/api/login", get(handlers::login))
            .route("/api/spotify-callback", get(handlers::spotify_callback))
            .route("/api/spotify-current-playing", get(handlers::current_playing))
            .route("/api/health", get(handlers::health))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .merge(api)
            .route(views::FEED_PATH, get(feed_handler))
            .fallback(handlers::view)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(http_trace_layer())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until shutdown, accepting connections on `listener`.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_url = %self.state.router.base_url(),
            "HTTP server starting"
        );

        let poller = PlaybackPoller::new(
            self.state.spotify.as_ref().clone(),
            self.config.playback.clone(),
            self.updates,
        );
        let poller_handle = tokio::spawn(poller.run(self.state.shutdown.subscribe()));

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(self.state.shutdown.wait())
            .await?;

        if let Err(e) = poller_handle.await {
            tracing::error!(error = %e, "Playback poller task failed");
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Shared state, e.g. for seeding a token.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
