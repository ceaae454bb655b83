//! Current-song overlay server library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod playback;
pub mod resilience;
pub mod routing;
pub mod spotify;
pub mod views;

pub use config::schema::OverlayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Route, Router, RoutingError};
