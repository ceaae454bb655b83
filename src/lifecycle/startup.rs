//! Startup orchestration.
//!
//! # Responsibilities
//! - Build shared clients from configuration
//! - Bind the listener once everything else is ready
//! - Classify startup failures for the operator

use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, OverlayConfig};
use crate::routing::RoutingError;
use crate::spotify::SpotifyError;

/// Fatal errors during startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("Spotify setup failed: {0}")]
    Spotify(#[from] SpotifyError),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
}

/// Shared HTTP client for upstream calls.
pub fn upstream_client(config: &OverlayConfig) -> Result<reqwest::Client, StartupError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeouts.upstream_secs))
        .user_agent(concat!("song-overlay/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Bind the configured listener address.
pub async fn bind(config: &OverlayConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address.clone();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}
