//! Route lookup and navigation.
//!
//! # Responsibilities
//! - Store the compiled route table
//! - Look up the matching route for a location or name
//! - Invoke loaders and record visited locations
//!
//! # Design Decisions
//! - Table immutable after construction (shared via Arc without locks)
//! - O(n) path scan in table order (route counts are tiny)
//! - Explicit NotFound rather than silent default
//! - History is only updated after the loader succeeds

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use crate::observability::metrics;
use crate::routing::history::{normalize_base, HistoryMode, HistoryStack};
use crate::routing::matcher::{Matcher, PathPattern};
use crate::routing::route::{Route, View};
use crate::routing::RoutingError;

/// Where to navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// A route name, e.g. `current_song`.
    Name(&'a str),
    /// A location, e.g. `/` or `/base/#/`.
    Path(&'a str),
}

/// Router navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    /// No navigation pending.
    Idle,
    /// At least one match and load in flight.
    Resolving,
}

/// Counts one in-flight navigation until it finishes or is dropped.
struct ResolvingGuard<'a>(&'a AtomicUsize);

impl<'a> ResolvingGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Application router: ordered route table plus history.
#[derive(Debug)]
pub struct Router {
    base_url: String,
    mode: HistoryMode,
    table: Vec<(PathPattern, Route)>,
    history: Mutex<HistoryStack>,
    in_flight: AtomicUsize,
}

impl Router {
    /// Build a router bound to `base_url`.
    ///
    /// Fails if two routes share a name or their paths would match the same
    /// location.
    pub fn configure(
        base_url: &str,
        mode: HistoryMode,
        routes: Vec<Route>,
    ) -> Result<Self, RoutingError> {
        let mut problems = Vec::new();
        let mut table: Vec<(PathPattern, Route)> = Vec::with_capacity(routes.len());

        for route in routes {
            if route.name().is_empty() {
                problems.push(format!("route '{}' has an empty name", route.path()));
            }
            if table.iter().any(|(_, r)| r.name() == route.name()) {
                problems.push(format!("duplicate route name '{}'", route.name()));
            }

            let pattern = match PathPattern::parse(route.path()) {
                Ok(p) => p,
                Err(RoutingError::Configuration(msg)) => {
                    problems.push(msg);
                    continue;
                }
                Err(e) => return Err(e),
            };
            if let Some((_, existing)) = table.iter().find(|(p, _)| p.collides_with(&pattern)) {
                problems.push(format!(
                    "path '{}' of route '{}' collides with route '{}'",
                    route.path(),
                    route.name(),
                    existing.name()
                ));
            }

            table.push((pattern, route));
        }

        if !problems.is_empty() {
            return Err(RoutingError::Configuration(problems.join("; ")));
        }

        let base_url = normalize_base(base_url);
        tracing::debug!(
            base_url = %base_url,
            mode = ?mode,
            routes = table.len(),
            "Router configured"
        );

        Ok(Self {
            base_url,
            mode,
            table,
            history: Mutex::new(HistoryStack::new()),
            in_flight: AtomicUsize::new(0),
        })
    }

    /// Match a location against the table, first match wins.
    pub fn resolve(&self, current_path: &str) -> Result<&Route, RoutingError> {
        let not_found = || RoutingError::NotFound(current_path.to_string());
        let route_path = self
            .mode
            .route_path(&self.base_url, current_path)
            .ok_or_else(not_found)?;

        self.table
            .iter()
            .find(|(pattern, _)| pattern.matches(&route_path))
            .map(|(_, route)| route)
            .ok_or_else(not_found)
    }

    /// Look up a route by name.
    pub fn resolve_name(&self, name: &str) -> Result<&Route, RoutingError> {
        self.table
            .iter()
            .map(|(_, route)| route)
            .find(|route| route.name() == name)
            .ok_or_else(|| RoutingError::NotFound(name.to_string()))
    }

    /// Absolute location for the named route.
    pub fn href(&self, name: &str) -> Result<String, RoutingError> {
        let pattern = self
            .table
            .iter()
            .find(|(_, route)| route.name() == name)
            .map(|(pattern, _)| pattern)
            .ok_or_else(|| RoutingError::NotFound(name.to_string()))?;
        Ok(self.mode.location(&self.base_url, &pattern.canonical()))
    }

    /// Resolve a location and load its view without touching history.
    pub async fn load(&self, current_path: &str) -> Result<View, RoutingError> {
        let route = self.resolve(current_path)?;
        load_route(route).await
    }

    /// Resolve the target, load its view and push one history entry.
    ///
    /// On failure the history and current location are left unchanged.
    pub async fn navigate(&self, target: Target<'_>) -> Result<View, RoutingError> {
        let _guard = ResolvingGuard::enter(&self.in_flight);

        let (route, location) = match target {
            Target::Name(name) => {
                let route = self.resolve_name(name);
                let location = self.href(name);
                match (route, location) {
                    (Ok(route), Ok(location)) => (route, location),
                    (Err(e), _) | (_, Err(e)) => {
                        metrics::record_navigation(name, "not_found");
                        return Err(e);
                    }
                }
            }
            Target::Path(path) => match self.resolve(path) {
                Ok(route) => (route, path.to_string()),
                Err(e) => {
                    metrics::record_navigation("none", "not_found");
                    tracing::debug!(path = %path, "No route matched");
                    return Err(e);
                }
            },
        };

        let view = load_route(route).await?;
        self.history().push(location.clone());

        tracing::debug!(route = %route.name(), location = %location, "Navigated");
        Ok(view)
    }

    /// Step back in history and reload that entry's view.
    pub async fn back(&self) -> Option<Result<View, RoutingError>> {
        let location = self.history().back()?.to_string();
        Some(self.reload(&location).await)
    }

    /// Step forward in history and reload that entry's view.
    pub async fn forward(&self) -> Option<Result<View, RoutingError>> {
        let location = self.history().forward()?.to_string();
        Some(self.reload(&location).await)
    }

    /// Current history location, if any navigation succeeded.
    pub fn current_location(&self) -> Option<String> {
        self.history().current().map(str::to_string)
    }

    /// Number of entries on the history stack.
    pub fn history_len(&self) -> usize {
        self.history().len()
    }

    pub fn state(&self) -> NavigationState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            NavigationState::Resolving
        } else {
            NavigationState::Idle
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    /// Routes in table order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.table.iter().map(|(_, route)| route)
    }

    async fn reload(&self, location: &str) -> Result<View, RoutingError> {
        let _guard = ResolvingGuard::enter(&self.in_flight);
        self.load(location).await
    }

    fn history(&self) -> MutexGuard<'_, HistoryStack> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

async fn load_route(route: &Route) -> Result<View, RoutingError> {
    let start = Instant::now();
    match route.load().await {
        Ok(view) => {
            metrics::record_navigation(route.name(), "loaded");
            metrics::record_load_duration(route.name(), start);
            Ok(view)
        }
        Err(e) => {
            tracing::warn!(route = %route.name(), error = %e, "Route loader failed");
            metrics::record_navigation(route.name(), "load_failed");
            Err(RoutingError::Load {
                route: route.name().to_string(),
                reason: e.to_string(),
            })
        }
    }
}
