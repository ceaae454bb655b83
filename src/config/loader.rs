//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::OverlayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override file values.
pub const ENV_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const ENV_REDIRECT_URL: &str = "SPOTIFY_REDIRECT_URL";
pub const ENV_BASE_URL: &str = "BASE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply
/// environment overrides.
pub fn load_config(path: &Path) -> Result<OverlayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: OverlayConfig = toml::from_str(&content)?;
    finalize(config, |key| std::env::var(key).ok())
}

/// Defaults plus environment overrides, for running without a file.
pub fn load_from_env() -> Result<OverlayConfig, ConfigError> {
    finalize(OverlayConfig::default(), |key| std::env::var(key).ok())
}

/// Apply overrides from `lookup` and validate.
pub fn finalize<F>(mut config: OverlayConfig, lookup: F) -> Result<OverlayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty(ENV_CLIENT_ID) {
        config.spotify.client_id = v;
    }
    if let Some(v) = non_empty(ENV_CLIENT_SECRET) {
        config.spotify.client_secret = v;
    }
    if let Some(v) = non_empty(ENV_REDIRECT_URL) {
        config.spotify.redirect_url = v;
    }
    if let Some(v) = non_empty(ENV_BASE_URL) {
        config.app.base_url = v;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
