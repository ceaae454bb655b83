//! Spotify Web API client.
//!
//! # Responsibilities
//! - Query the user's currently-playing track
//! - Map HTTP status codes onto `SpotifyError`
//! - Retry once after refreshing an expired token

use reqwest::StatusCode;
use std::sync::Arc;

use crate::spotify::auth::Authenticator;
use crate::spotify::error::{SpotifyError, SpotifyResult};
use crate::spotify::types::CurrentlyPlaying;

/// Authenticated Web API client.
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    api_url: String,
    auth: Arc<Authenticator>,
}

impl SpotifyClient {
    pub fn new(http: reqwest::Client, api_url: &str, auth: Arc<Authenticator>) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    pub fn auth(&self) -> &Arc<Authenticator> {
        &self.auth
    }

    /// The user's current playback, `None` when nothing is playing.
    pub async fn current_track(&self) -> SpotifyResult<Option<CurrentlyPlaying>> {
        let token = self.auth.token().ok_or(SpotifyError::NoToken)?;

        let response = self
            .http
            .get(format!("{}/me/player/currently-playing", self.api_url))
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::UNAUTHORIZED => Err(SpotifyError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());
                Err(SpotifyError::RateLimited { retry_after_secs })
            }
            status if status.is_success() => {
                let playing = response
                    .json::<CurrentlyPlaying>()
                    .await
                    .map_err(|e| SpotifyError::InvalidResponse(e.to_string()))?;
                Ok(Some(playing))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SpotifyError::InvalidResponse(format!("{}: {}", status, body)))
            }
        }
    }

    /// Like `current_track`, refreshing the token once on `Unauthorized`
    /// or when it has already expired.
    pub async fn current_track_refreshing(&self) -> SpotifyResult<Option<CurrentlyPlaying>> {
        let expired = self.auth.token().map(|t| t.is_expired()).unwrap_or(false);
        if expired {
            self.try_refresh().await?;
        }

        match self.current_track().await {
            Err(SpotifyError::Unauthorized) => {
                self.try_refresh().await?;
                self.current_track().await
            }
            other => other,
        }
    }

    async fn try_refresh(&self) -> SpotifyResult<()> {
        match self.auth.refresh().await {
            Ok(_) => Ok(()),
            // Nothing to refresh with
            Err(SpotifyError::NoToken) => Err(SpotifyError::Unauthorized),
            Err(e) => Err(e),
        }
    }
}
