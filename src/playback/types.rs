//! Track update payloads sent to overlay clients.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::spotify::CurrentlyPlaying;

/// Event name carried by every feed message.
pub const TRACK_CHANGE_EVENT: &str = "track_change";

/// Snapshot of the track currently playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackUpdate {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub playing: bool,
    /// Unix seconds when the snapshot was taken.
    pub time: u64,
}

impl TrackUpdate {
    /// Build an update from playback state. `None` when nothing is playing
    /// or the item has no name (ads, episodes without metadata).
    pub fn from_playback(playback: &CurrentlyPlaying) -> Option<Self> {
        let item = playback.item.as_ref()?;
        if !playback.is_playing || item.name.is_empty() {
            return None;
        }

        Some(Self {
            id: item.id.clone().unwrap_or_default(),
            name: item.name.clone(),
            artists: playback.artist_names(),
            album: item.album.name.clone(),
            playing: playback.is_playing,
            time: unix_now(),
        })
    }

    /// Same track and play state, ignoring the snapshot time.
    pub fn same_state(&self, other: &TrackUpdate) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.artists == other.artists
            && self.album == other.album
            && self.playing == other.playing
    }
}

/// Feed message pushed over the WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackChange {
    pub event: String,
    pub track: Option<String>,
    #[serde(default)]
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub time: u64,
}

impl TrackChange {
    pub fn from_update(update: Option<&TrackUpdate>) -> Self {
        match update {
            Some(update) => Self {
                event: TRACK_CHANGE_EVENT.to_string(),
                track: Some(update.name.clone()),
                artists: update.artists.clone(),
                album: Some(update.album.clone()),
                time: update.time,
            },
            None => Self {
                event: TRACK_CHANGE_EVENT.to_string(),
                track: None,
                artists: Vec::new(),
                album: None,
                time: unix_now(),
            },
        }
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
