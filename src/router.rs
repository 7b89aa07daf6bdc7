//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler, and every handler receives the same shared state.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

/// The application router.
///
/// One radix tree per HTTP method. Build it once at startup with the state
/// every handler shares, then pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: Arc<S>,
}

/// Outcome of matching a method + path pair.
pub(crate) enum Route<S> {
    Found(BoxedHandler<S>, HashMap<String, String>),
    /// The path exists, but not for this method.
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

impl<S: Send + Sync + 'static> Router<S> {
    pub fn new(state: S) -> Self {
        Self::with_state(Arc::new(state))
    }

    /// Build a router around state the caller keeps a handle to.
    pub fn with_state(state: Arc<S>) -> Self {
        Self { routes: HashMap::new(), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    /// Static segments win over parameters, so `/api/posts/search` and
    /// `/api/posts/{id}` coexist.
    ///
    /// # Panics
    ///
    /// Panics on a malformed or conflicting route. Routes are fixed at
    /// startup, so this is a programming error.
    pub fn on(self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.add(method, path, handler)
    }

    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.add(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler<S>) -> Self {
        self.add(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler<S>) -> Self {
        self.add(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler<S>) -> Self {
        self.add(Method::Delete, path, handler)
    }

    fn add(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    /// Matches `method` + `path`. `HEAD` falls back to the `GET` route when
    /// no `HEAD` route is registered; the server drops the body.
    pub(crate) fn lookup(&self, method: Method, path: &str) -> Route<S> {
        let found = match self.match_route(method, path) {
            None if method == Method::Head => self.match_route(Method::Get, path),
            found => found,
        };
        if let Some((handler, params)) = found {
            return Route::Found(handler, params);
        }

        let allowed = self.allowed_methods(path);
        if allowed.is_empty() {
            Route::NotFound
        } else {
            Route::MethodNotAllowed(allowed)
        }
    }

    fn match_route(&self, method: Method, path: &str) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let matched = self.routes.get(&method)?.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Methods with a route matching `path`, in [`Method::ALL`] order. A `GET`
    /// route implies `HEAD`.
    pub(crate) fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let has = |m: Method| {
            self.routes
                .get(&m)
                .is_some_and(|tree| tree.at(path).is_ok())
        };
        Method::ALL
            .into_iter()
            .filter(|&m| has(m) || (m == Method::Head && has(Method::Get)))
            .collect()
    }
}
