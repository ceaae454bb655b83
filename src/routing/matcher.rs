//! Route path matching logic.
//!
//! # Responsibilities
//! - Parse route path patterns into normalized segments
//! - Match a location path against a pattern (case-sensitive)
//! - Detect patterns that would match the same location
//!
//! # Design Decisions
//! - Empty segments are ignored, so `/a` and `/a/` are the same pattern
//! - Query strings are not part of the matched path
//! - No regex to guarantee O(n) matching

use crate::routing::RoutingError;

/// Trait for matching location paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// A compiled route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<String>,
}

impl PathPattern {
    /// Parse a route path. Patterns must be absolute.
    pub fn parse(pattern: &str) -> Result<Self, RoutingError> {
        if !pattern.starts_with('/') {
            return Err(RoutingError::Configuration(format!(
                "route path '{}' must start with '/'",
                pattern
            )));
        }
        if pattern.contains(['?', '#']) {
            return Err(RoutingError::Configuration(format!(
                "route path '{}' must not contain a query or fragment",
                pattern
            )));
        }

        Ok(Self {
            segments: split_segments(pattern),
        })
    }

    /// True if both patterns accept the same set of locations.
    pub fn collides_with(&self, other: &PathPattern) -> bool {
        self.segments == other.segments
    }

    /// Canonical form of the pattern (`/` for the root).
    pub fn canonical(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl Matcher for PathPattern {
    fn matches(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or_default();
        let mut incoming = path.split('/').filter(|s| !s.is_empty());

        for expected in &self.segments {
            match incoming.next() {
                Some(segment) if segment == expected => {}
                _ => return false,
            }
        }
        incoming.next().is_none()
    }
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
