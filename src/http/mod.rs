//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (Spotify auth + playback API)
//!     → websocket.rs (playback feed)
//!     → routed views (everything else, via the app router)
//!     → response.rs (JSON status bodies)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use request::{request_id, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
