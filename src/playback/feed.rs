//! Shared playback feed and connected-client registry.

use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use uuid::Uuid;

use crate::observability::metrics;
use crate::playback::types::TrackUpdate;

/// A connected overlay client.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub addr: SocketAddr,
    pub connected_at: Instant,
}

/// Latest playback snapshot plus the clients watching it.
#[derive(Clone)]
pub struct PlaybackFeed {
    rx: watch::Receiver<Option<TrackUpdate>>,
    clients: Arc<DashMap<Uuid, ClientInfo>>,
}

impl PlaybackFeed {
    /// Create a feed and the sender the poller publishes on.
    pub fn channel() -> (watch::Sender<Option<TrackUpdate>>, Self) {
        let (tx, rx) = watch::channel(None);
        (
            tx,
            Self {
                rx,
                clients: Arc::new(DashMap::new()),
            },
        )
    }

    /// Receiver positioned at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Option<TrackUpdate>> {
        self.rx.clone()
    }

    pub fn latest(&self) -> Option<TrackUpdate> {
        self.rx.borrow().clone()
    }

    /// Track a client for as long as the returned handle lives.
    pub fn register(&self, addr: SocketAddr) -> ClientHandle {
        let id = Uuid::new_v4();
        self.clients.insert(
            id,
            ClientInfo {
                addr,
                connected_at: Instant::now(),
            },
        );
        metrics::set_feed_clients(self.clients.len());
        tracing::info!(client_id = %id, addr = %addr, "Overlay client connected");

        ClientHandle {
            id,
            clients: self.clients.clone(),
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

/// Removes the client from the registry on drop.
pub struct ClientHandle {
    id: Uuid,
    clients: Arc<DashMap<Uuid, ClientInfo>>,
}

impl ClientHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        if let Some((_, info)) = self.clients.remove(&self.id) {
            tracing::info!(
                client_id = %self.id,
                connected_secs = info.connected_at.elapsed().as_secs(),
                "Overlay client disconnected"
            );
        }
        metrics::set_feed_clients(self.clients.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_follows_handles() {
        let (_tx, feed) = PlaybackFeed::channel();
        let addr: SocketAddr = "127.0.0.1:5000".parse().unwrap();

        let first = feed.register(addr);
        let second = feed.register(addr);
        assert_ne!(first.id(), second.id());
        assert_eq!(feed.client_count(), 2);

        drop(first);
        assert_eq!(feed.client_count(), 1);
        drop(second);
        assert_eq!(feed.client_count(), 0);
    }

    #[test]
    fn test_latest_reflects_sender() {
        let (tx, feed) = PlaybackFeed::channel();
        assert!(feed.latest().is_none());

        tx.send_replace(Some(TrackUpdate {
            id: "1".into(),
            name: "Song".into(),
            artists: vec![],
            album: String::new(),
            playing: true,
            time: 0,
        }));
        assert_eq!(feed.latest().unwrap().name, "Song");
    }
}
