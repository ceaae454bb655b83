//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation request (route name or location)
//!     → router.rs (route lookup, table order)
//!     → matcher.rs (evaluate path pattern)
//!     → route.rs (invoke the route's loader)
//!     → history.rs (push the new location)
//!     → Return: View, NotFound or load failure
//!
//! Route Compilation (at startup):
//!     Route[]
//!     → Parse path patterns
//!     → Reject duplicate names and colliding paths
//!     → Freeze as immutable route table
//! ```
//!
//! # Design Decisions
//! - Route table immutable after configure
//! - Deterministic: same path always resolves to the same route
//! - First match wins (table order)
//! - No catch-all: unmatched paths are an explicit NotFound

pub mod history;
pub mod matcher;
pub mod route;
pub mod router;

pub use history::{HistoryMode, HistoryStack};
pub use route::{LoadError, Loader, Route, View};
pub use router::{NavigationState, Router, Target};

use thiserror::Error;

/// Errors surfaced by the router.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// The route table is malformed (duplicate names, colliding paths).
    #[error("Route configuration error: {0}")]
    Configuration(String),

    /// No route matches the requested path or name.
    #[error("No route matches '{0}'")]
    NotFound(String),

    /// The matched route's loader failed.
    #[error("Failed to load route '{route}': {reason}")]
    Load { route: String, reason: String },
}
