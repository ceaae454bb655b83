//! Spotify Web API payloads.
//!
//! Only the fields the overlay consumes are modelled; everything is
//! defaulted so partial payloads (ads, local files, podcasts) still parse.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// `GET /me/player/currently-playing` response body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CurrentlyPlaying {
    pub device: Option<Device>,
    pub timestamp: i64,
    pub progress_ms: Option<u64>,
    pub is_playing: bool,
    pub currently_playing_type: String,
    pub item: Option<Track>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_active: bool,
    pub volume_percent: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub duration_ms: u64,
    pub album: Album,
    pub artists: Vec<Artist>,
    pub is_local: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Album {
    pub id: Option<String>,
    pub name: String,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Artist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

impl CurrentlyPlaying {
    /// Names of the current item's artists, in credit order.
    pub fn artist_names(&self) -> Vec<String> {
        self.item
            .as_ref()
            .map(|item| item.artists.iter().map(|a| a.name.clone()).collect())
            .unwrap_or_default()
    }
}

/// Token endpoint response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPayload {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
}

/// An access token held by the authenticator.
#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub refresh_token: Option<String>,
    pub expires_at: Instant,
}

impl Token {
    /// Build a token from an endpoint payload, keeping `previous_refresh`
    /// when the payload omits a refresh token.
    pub fn from_payload(payload: TokenPayload, previous_refresh: Option<String>) -> Self {
        Self {
            access_token: payload.access_token,
            token_type: payload.token_type,
            scope: payload.scope,
            refresh_token: payload.refresh_token.or(previous_refresh),
            expires_at: Instant::now() + Duration::from_secs(payload.expires_in),
        }
    }

    /// Whole seconds until expiry (0 once expired).
    pub fn expires_in(&self) -> u64 {
        self.expires_at
            .saturating_duration_since(Instant::now())
            .as_secs()
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}
