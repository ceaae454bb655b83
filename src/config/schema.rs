//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the overlay
//! server. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::HistoryMode;

/// Root configuration for the overlay server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OverlayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Front-end routing settings.
    pub app: AppConfig,

    /// Spotify API credentials and endpoints.
    pub spotify: SpotifyConfig,

    /// Playback polling settings.
    pub playback: PlaybackConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Front-end routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL prefix the views are served under.
    pub base_url: String,

    /// History mode: "web" or "hash".
    pub history: HistoryMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            history: HistoryMode::Web,
        }
    }
}

/// Spotify application credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: String,

    pub client_secret: String,

    /// OAuth redirect target, must point at `/api/spotify-callback`.
    pub redirect_url: String,

    /// Requested OAuth scopes.
    pub scopes: Vec<String>,

    /// Accounts service base URL (authorize + token endpoints).
    pub accounts_url: String,

    /// Web API base URL.
    pub api_url: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: "http://localhost:8080/api/spotify-callback".to_string(),
            scopes: vec![
                "user-read-currently-playing".to_string(),
                "user-read-playback-state".to_string(),
            ],
            accounts_url: "https://accounts.spotify.com".to_string(),
            api_url: "https://api.spotify.com/v1".to_string(),
        }
    }
}

/// Playback poller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between polls while a track is playing, in milliseconds.
    pub playing_delay_ms: u64,

    /// Delay between polls while nothing is playing, in milliseconds.
    pub not_playing_delay_ms: u64,

    /// WebSocket ping period in seconds.
    pub ping_period_secs: u64,

    /// Base delay for exponential backoff after poll errors, in milliseconds.
    pub error_base_delay_ms: u64,

    /// Maximum backoff delay, in milliseconds.
    pub error_max_delay_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            playing_delay_ms: 1_000,
            not_playing_delay_ms: 10_000,
            ping_period_secs: 30,
            error_base_delay_ms: 1_000,
            error_max_delay_ms: 60_000,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout for HTTP handlers in seconds.
    pub request_secs: u64,

    /// Timeout for upstream Spotify calls in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON logs instead of human-readable lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OverlayConfig::default();
        assert_eq!(config.app.base_url, "/");
        assert_eq!(config.app.history, HistoryMode::Web);
        assert_eq!(config.playback.playing_delay_ms, 1_000);
        assert_eq!(config.playback.not_playing_delay_ms, 10_000);
        assert_eq!(config.playback.ping_period_secs, 30);
    }

    #[test]
    fn test_partial_toml() {
        let config: OverlayConfig = toml::from_str(
            r#"
            [app]
            base_url = "/overlay/"
            history = "hash"

            [spotify]
            client_id = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.app.history, HistoryMode::Hash);
        assert_eq!(config.spotify.client_id, "abc");
        assert_eq!(config.spotify.scopes.len(), 2);
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
    }
}
