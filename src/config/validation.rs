//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delays > 0, addresses parse)
//! - Check URLs the server builds requests from
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: OverlayConfig → Result<(), Vec<ValidationError>>
//! - Missing Spotify credentials are left to the authenticator, which
//!   refuses to start without them

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::OverlayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &OverlayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.app.base_url.contains(['?', '#']) {
        errors.push(ValidationError::new(
            "app.base_url",
            "must not contain a query or fragment",
        ));
    }

    for (field, value) in [
        ("spotify.redirect_url", &config.spotify.redirect_url),
        ("spotify.accounts_url", &config.spotify.accounts_url),
        ("spotify.api_url", &config.spotify.api_url),
    ] {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::new(field, format!("'{}' is not a URL", value)));
        }
    }

    if config.spotify.scopes.is_empty() {
        errors.push(ValidationError::new("spotify.scopes", "at least one scope is required"));
    }

    let playback = &config.playback;
    for (field, value) in [
        ("playback.playing_delay_ms", playback.playing_delay_ms),
        ("playback.not_playing_delay_ms", playback.not_playing_delay_ms),
        ("playback.ping_period_secs", playback.ping_period_secs),
        ("playback.error_base_delay_ms", playback.error_base_delay_ms),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }
    if playback.error_max_delay_ms < playback.error_base_delay_ms {
        errors.push(ValidationError::new(
            "playback.error_max_delay_ms",
            "must not be less than error_base_delay_ms",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
