//! Spotify integration errors.

use thiserror::Error;

/// Errors that can occur while talking to Spotify.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Client id or secret not configured.
    #[error("Spotify client credentials are not configured")]
    MissingConfig,

    /// OAuth callback carried a state we did not issue.
    #[error("Invalid OAuth state")]
    InvalidState,

    /// Token endpoint rejected the exchange or refresh.
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// No access token has been obtained yet.
    #[error("No access token available")]
    NoToken,

    /// Access token invalid or expired.
    #[error("Unauthorized: invalid or expired token")]
    Unauthorized,

    /// Web API rate limit hit.
    #[error("Rate limit exceeded")]
    RateLimited {
        /// Seconds from the Retry-After header, when present.
        retry_after_secs: Option<u64>,
    },

    /// Unexpected status or body.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Transport failure.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Result type for Spotify operations.
pub type SpotifyResult<T> = Result<T, SpotifyError>;
