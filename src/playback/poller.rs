//! Background playback poller.
//!
//! # Responsibilities
//! - Periodically query the current track
//! - Publish a new snapshot only when the track or play state changes
//! - Slow down while idle and back off after upstream errors

use futures_util::future::BoxFuture;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time;

use crate::config::PlaybackConfig;
use crate::observability::metrics;
use crate::playback::types::TrackUpdate;
use crate::resilience::backoff::Backoff;
use crate::spotify::{CurrentlyPlaying, SpotifyClient, SpotifyError, SpotifyResult};

/// Anything that can report the current playback.
pub trait PlaybackSource: Send + Sync {
    fn current(&self) -> BoxFuture<'_, SpotifyResult<Option<CurrentlyPlaying>>>;
}

impl PlaybackSource for SpotifyClient {
    fn current(&self) -> BoxFuture<'_, SpotifyResult<Option<CurrentlyPlaying>>> {
        Box::pin(self.current_track_refreshing())
    }
}

/// Delay before the next poll after a successful one.
pub fn next_delay(config: &PlaybackConfig, playing: bool) -> Duration {
    if playing {
        Duration::from_millis(config.playing_delay_ms)
    } else {
        Duration::from_millis(config.not_playing_delay_ms)
    }
}

pub struct PlaybackPoller<S> {
    source: S,
    config: PlaybackConfig,
    tx: watch::Sender<Option<TrackUpdate>>,
    backoff: Backoff,
}

impl<S: PlaybackSource> PlaybackPoller<S> {
    pub fn new(source: S, config: PlaybackConfig, tx: watch::Sender<Option<TrackUpdate>>) -> Self {
        let backoff = Backoff::new(config.error_base_delay_ms, config.error_max_delay_ms);
        Self {
            source,
            config,
            tx,
            backoff,
        }
    }

    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            playing_delay_ms = self.config.playing_delay_ms,
            not_playing_delay_ms = self.config.not_playing_delay_ms,
            "Playback poller starting"
        );

        loop {
            let delay = self.poll_once().await;
            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Playback poller received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Poll once, publish the result and return the delay until the next poll.
    pub async fn poll_once(&mut self) -> Duration {
        match self.source.current().await {
            Ok(playback) => {
                self.backoff.reset();
                let update = playback.as_ref().and_then(TrackUpdate::from_playback);
                let playing = update.is_some();
                metrics::record_poll(if playing { "playing" } else { "idle" });
                self.publish(update);
                next_delay(&self.config, playing)
            }
            Err(SpotifyError::NoToken) => {
                tracing::debug!("No Spotify token yet, waiting for login");
                metrics::record_poll("no_token");
                self.publish(None);
                next_delay(&self.config, false)
            }
            Err(e) => {
                let mut delay = self.backoff.fail();
                if let SpotifyError::RateLimited {
                    retry_after_secs: Some(secs),
                } = e
                {
                    delay = delay.max(Duration::from_secs(secs));
                }

                tracing::warn!(
                    error = %e,
                    failures = self.backoff.failures(),
                    delay = ?delay,
                    "Playback poll failed"
                );
                metrics::record_poll("error");
                self.publish(None);
                delay
            }
        }
    }

    fn publish(&self, update: Option<TrackUpdate>) {
        let changed = self.tx.send_if_modified(|current| {
            let changed = match (current.as_ref(), update.as_ref()) {
                (Some(a), Some(b)) => !a.same_state(b),
                (None, None) => false,
                _ => true,
            };
            if changed {
                *current = update;
            }
            changed
        });

        if changed {
            match self.tx.borrow().as_ref() {
                Some(track) => tracing::info!(
                    track = %track.name,
                    artists = ?track.artists,
                    "Track changed"
                ),
                None => tracing::info!("Playback stopped"),
            }
        }
    }
}
