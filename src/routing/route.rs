//! Route definitions and the views they produce.

use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// A loaded, renderable view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Name of the route that produced this view.
    pub route_name: String,
    /// Document title.
    pub title: String,
    /// Full HTML document.
    pub body: String,
}

/// Error returned by a loader that could not produce its view.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct LoadError(pub String);

/// Deferred factory producing a route's view.
pub type Loader = Arc<dyn Fn() -> BoxFuture<'static, Result<View, LoadError>> + Send + Sync>;

/// A mapping from a path pattern to a named, lazily-loaded view.
#[derive(Clone)]
pub struct Route {
    path: String,
    name: String,
    loader: Loader,
}

impl Route {
    /// Create a route. The loader runs once per navigation to this route.
    pub fn new<F, Fut>(path: impl Into<String>, name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<View, LoadError>> + Send + 'static,
    {
        let loader: Loader = Arc::new(move || loader().boxed());
        Self {
            path: path.into(),
            name: name.into(),
            loader,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the loader.
    pub async fn load(&self) -> Result<View, LoadError> {
        (self.loader)().await
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.name == other.name
    }
}
