//! Spotify integration subsystem.
//!
//! # Data Flow
//! ```text
//! /api/login → auth.rs (authorization URL with state)
//!     → Spotify accounts consent screen
//!     → /api/spotify-callback (state, code)
//!     → auth.rs (code → token, stored for all callers)
//!     → client.rs (currently-playing queries with bearer token)
//! ```
//!
//! # Security Constraints
//! - Credentials ONLY from config file or environment variables
//! - Never log tokens or the client secret

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::Authenticator;
pub use client::SpotifyClient;
pub use error::{SpotifyError, SpotifyResult};
pub use types::{CurrentlyPlaying, Token};
