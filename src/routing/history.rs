//! Navigation history.
//!
//! # Responsibilities
//! - Translate between route paths and address-bar locations
//! - Keep the back/forward stack of visited locations
//!
//! # Design Decisions
//! - `Web` mode puts the route path after the base URL (`/base/path`)
//! - `Hash` mode keeps it in the fragment (`/base/#/path`)
//! - Pushing a new entry discards any forward entries

use serde::{Deserialize, Serialize};

/// Strategy used to represent the route in the address bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Path-based locations (HTML5 history).
    #[default]
    Web,
    /// Fragment-based locations.
    Hash,
}

impl HistoryMode {
    /// Build the location for a route path under `base_url`.
    ///
    /// `base_url` must already be normalized (leading and trailing `/`).
    pub fn location(&self, base_url: &str, route_path: &str) -> String {
        let route_path = route_path.trim_start_matches('/');
        match self {
            HistoryMode::Web => format!("{}{}", base_url, route_path),
            HistoryMode::Hash => format!("{}#/{}", base_url, route_path),
        }
    }

    /// Extract the route path from a location, or `None` when the location
    /// lies outside `base_url`.
    pub fn route_path(&self, base_url: &str, location: &str) -> Option<String> {
        match self {
            HistoryMode::Web => {
                let location = location.split('#').next().unwrap_or_default();
                strip_base(base_url, location)
            }
            HistoryMode::Hash => {
                let (before, fragment) = match location.split_once('#') {
                    Some((before, fragment)) => (before, Some(fragment)),
                    None => (location, None),
                };
                let before = before.split('?').next().unwrap_or_default();
                // The route lives in the fragment, so nothing may follow the base
                if strip_base(base_url, before)? != "/" {
                    return None;
                }

                let fragment = fragment.unwrap_or("/");
                if fragment.starts_with('/') {
                    Some(fragment.to_string())
                } else {
                    Some(format!("/{}", fragment))
                }
            }
        }
    }
}

/// Normalize a base URL to `/`, `/prefix/`, `/a/b/`.
pub fn normalize_base(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

fn strip_base(base_url: &str, location: &str) -> Option<String> {
    let location = if location.is_empty() { "/" } else { location };
    if let Some(rest) = location.strip_prefix(base_url) {
        return Some(format!("/{}", rest));
    }
    // "/app" addresses the root of base "/app/"
    let (path, query) = match location.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (location, None),
    };
    if base_url.len() > 1 && path == &base_url[..base_url.len() - 1] {
        return Some(match query {
            Some(query) => format!("/?{}", query),
            None => "/".to_string(),
        });
    }
    None
}

/// Back/forward stack of locations.
#[derive(Debug, Default)]
pub struct HistoryStack {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new entry, discarding forward entries.
    pub fn push(&mut self, location: String) {
        let keep = self.cursor.map(|c| c + 1).unwrap_or(0);
        self.entries.truncate(keep);
        self.entries.push(location);
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn current(&self) -> Option<&str> {
        self.cursor.map(|c| self.entries[c].as_str())
    }

    /// Step back, returning the new current location.
    pub fn back(&mut self) -> Option<&str> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        self.current()
    }

    /// Step forward, returning the new current location.
    pub fn forward(&mut self) -> Option<&str> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        self.current()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base(""), "/");
        assert_eq!(normalize_base("/"), "/");
        assert_eq!(normalize_base("overlay"), "/overlay/");
        assert_eq!(normalize_base("/overlay/"), "/overlay/");
    }

    #[test]
    fn test_web_locations() {
        let mode = HistoryMode::Web;
        assert_eq!(mode.location("/", "/"), "/");
        assert_eq!(mode.location("/app/", "/"), "/app/");
        assert_eq!(mode.location("/app/", "/stats"), "/app/stats");

        assert_eq!(mode.route_path("/app/", "/app/stats"), Some("/stats".into()));
        assert_eq!(mode.route_path("/app/", "/app"), Some("/".into()));
        assert_eq!(mode.route_path("/app/", "/other"), None);
        assert_eq!(mode.route_path("/", "/?x=1"), Some("/?x=1".into()));
        assert_eq!(mode.route_path("/app/", "/app?x=1"), Some("/?x=1".into()));
        assert_eq!(mode.route_path("/app/", "/apple"), None);
    }

    #[test]
    fn test_hash_locations() {
        let mode = HistoryMode::Hash;
        assert_eq!(mode.location("/app/", "/stats"), "/app/#/stats");

        assert_eq!(mode.route_path("/app/", "/app/#/stats"), Some("/stats".into()));
        assert_eq!(mode.route_path("/app/", "/app/"), Some("/".into()));
        assert_eq!(mode.route_path("/", "/#stats"), Some("/stats".into()));
        assert_eq!(mode.route_path("/app/", "/else/#/stats"), None);
        assert_eq!(mode.route_path("/app/", "/app?x=1#/stats"), Some("/stats".into()));
        assert_eq!(mode.route_path("/app/", "/app/elsewhere"), None);
        assert_eq!(mode.route_path("/app/", "/app/a/b#/"), None);
    }

    #[test]
    fn test_stack_navigation() {
        let mut stack = HistoryStack::new();
        assert!(stack.back().is_none());

        stack.push("/a".into());
        stack.push("/b".into());
        stack.push("/c".into());
        assert_eq!(stack.back(), Some("/b"));
        assert_eq!(stack.back(), Some("/a"));
        assert_eq!(stack.back(), None);
        assert_eq!(stack.forward(), Some("/b"));

        // Pushing drops the forward entry "/c"
        stack.push("/d".into());
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.forward(), None);
        assert_eq!(stack.current(), Some("/d"));
    }
}
