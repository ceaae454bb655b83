//! Playback subsystem.
//!
//! # Data Flow
//! ```text
//! poller.rs (one task for the whole process)
//!     → Spotify currently-playing query
//!     → types.rs (CurrentlyPlaying → TrackUpdate)
//!     → feed.rs (watch channel, publish on change)
//!     → WebSocket connections (one subscriber each)
//! ```
//!
//! # Design Decisions
//! - A single upstream poller regardless of connected clients
//! - Subscribers only see the latest snapshot, never a backlog
//! - Poll faster while playing, slower while idle

pub mod feed;
pub mod poller;
pub mod types;

pub use feed::{ClientHandle, PlaybackFeed};
pub use poller::{PlaybackPoller, PlaybackSource};
pub use types::{TrackChange, TrackUpdate};
