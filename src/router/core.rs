//! Router core module - hot path for request routing.
//!
//! [`Router::find`] runs once per request. It borrows captured values straight
//! out of the request path and keeps them in stack storage for the common case,
//! so a match performs no heap allocation for routes with up to
//! [`MAX_INLINE_PARAMS`] parameters.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::constraint::{ConstraintCompiler, RegexCompiler};
use super::error::ConfigError;
use super::store::Store;
use crate::runtime_config::RouterConfig;

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., /users/:id/posts/:post_id).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Caller supplied capture buffer for [`Store::get`]: slot `i` receives the
/// value of the `i`-th parameter along the matching pattern.
pub type ParamValues<'p> = SmallVec<[&'p str; MAX_INLINE_PARAMS]>;

/// Named path parameters of a match, in pattern order.
///
/// Names are `Arc<str>` shared with the tree (built at startup, cloning is an
/// atomic increment); values borrow from the request path.
pub type ParamVec<'p> = SmallVec<[(Arc<str>, &'p str); MAX_INLINE_PARAMS]>;

/// Result of successfully matching a request path to a route
#[derive(Debug)]
pub struct RouteMatch<'r, 'p, T> {
    /// Payload registered with the matched pattern
    pub payload: &'r T,
    /// Path parameters extracted from the URL (e.g., `:id` → `("id", "123")`)
    pub path_params: ParamVec<'p>,
}

impl<'r, 'p, T> RouteMatch<'r, 'p, T> {
    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics: if duplicate parameter names exist
    /// at different path depths (e.g., `/org/:id/team/:team_id/user/:id`),
    /// returns the last occurrence (the user id, not the org id).
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&'p str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| *v)
    }

    /// Convert path_params to HashMap for compatibility with existing code
    /// Note: This allocates - use get_path_param() in hot paths instead
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), (*v).to_string()))
            .collect()
    }
}

/// Router that matches HTTP requests to payloads using one radix tree per method
///
/// Routes are registered during start-up with [`Router::add`] (or the per-method
/// helpers) and resolved with [`Router::find`]. Registration needs `&mut self`,
/// lookups only `&self`, so a built router can be shared across threads; use
/// [`SharedRouter`](super::SharedRouter) when routes must change while serving.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use pathtrie::router::Router;
///
/// let mut router = Router::new();
/// router.get("/users/:id", "get_user").unwrap();
/// router.post("/users", "create_user").unwrap();
///
/// let m = router.find(&Method::GET, "/users/123").unwrap();
/// assert_eq!(*m.payload, "get_user");
/// assert_eq!(m.get_path_param("id"), Some("123"));
/// assert!(router.find(&Method::DELETE, "/users/123").is_none());
/// ```
pub struct Router<T, C: ConstraintCompiler = RegexCompiler> {
    stores: HashMap<Method, Store<T, C>>,
    /// Registered (method, pattern) pairs in registration order
    routes: Vec<(Method, String)>,
    config: RouterConfig,
    compiler: C,
}

impl<T> Router<T> {
    /// Empty router with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Empty router using `config`
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self::with_compiler(RegexCompiler, config)
    }
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: ConstraintCompiler + Clone> Router<T, C> {
    /// Empty router whose stores compile constraints with `compiler`
    pub fn with_compiler(compiler: C, config: RouterConfig) -> Self {
        Self {
            stores: HashMap::new(),
            routes: Vec::new(),
            config,
            compiler,
        }
    }

    /// Register `pattern` for `method`.
    ///
    /// The store for `method` is created by its first successful registration.
    /// Returns the parameter count of the pattern. A duplicate pattern keeps
    /// its first payload and is not listed again in [`Router::routes`].
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for a malformed pattern or a constraint that does not
    /// compile. The router is unchanged in that case.
    pub fn add(&mut self, method: Method, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        let added = match self.stores.get_mut(&method) {
            Some(store) => store.register(pattern, payload)?,
            None => {
                let mut store = Store::with_compiler(self.compiler.clone(), &self.config);
                let added = store.register(pattern, payload)?;
                self.stores.insert(method.clone(), store);
                added
            }
        };
        if added.registered {
            debug!(
                method = %method,
                pattern = %pattern,
                params = added.params,
                "Route registered"
            );
            self.routes.push((method, pattern.to_string()));
        }
        Ok(added.params)
    }

    /// Register a `GET` route
    pub fn get(&mut self, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        self.add(Method::GET, pattern, payload)
    }

    /// Register a `POST` route
    pub fn post(&mut self, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        self.add(Method::POST, pattern, payload)
    }

    /// Register a `PUT` route
    pub fn put(&mut self, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        self.add(Method::PUT, pattern, payload)
    }

    /// Register a `PATCH` route
    pub fn patch(&mut self, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        self.add(Method::PATCH, pattern, payload)
    }

    /// Register a `DELETE` route
    pub fn delete(&mut self, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        self.add(Method::DELETE, pattern, payload)
    }

    /// Register a `HEAD` route
    pub fn head(&mut self, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        self.add(Method::HEAD, pattern, payload)
    }

    /// Register an `OPTIONS` route
    pub fn options(&mut self, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        self.add(Method::OPTIONS, pattern, payload)
    }

    /// Register a `TRACE` route
    pub fn trace(&mut self, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        self.add(Method::TRACE, pattern, payload)
    }

    /// Register a `CONNECT` route
    pub fn connect(&mut self, pattern: &str, payload: T) -> Result<usize, ConfigError> {
        self.add(Method::CONNECT, pattern, payload)
    }
}

impl<T, C: ConstraintCompiler> Router<T, C> {
    /// Match a request to a route
    ///
    /// Performs exactly one store lookup. Returns `None` when the method has
    /// no routes or no pattern matches the whole path; the serving layer maps
    /// that to a 404.
    #[must_use]
    pub fn find<'r, 'p>(&'r self, method: &Method, path: &'p str) -> Option<RouteMatch<'r, 'p, T>> {
        debug!(method = %method, path = %path, "Route match attempt");

        let Some(store) = self.stores.get(method) else {
            debug!(method = %method, path = %path, "No routes registered for method");
            return None;
        };

        let match_start = Instant::now();
        let mut values = ParamValues::new();
        let found = store.get(path, &mut values);
        let match_duration = match_start.elapsed();

        if match_duration > Duration::from_micros(self.config.slow_match_us) {
            warn!(
                method = %method,
                path = %path,
                matched = found.is_some(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        }

        let Some(found) = found else {
            debug!(
                method = %method,
                path = %path,
                duration_us = match_duration.as_micros(),
                "No route matched"
            );
            return None;
        };

        let path_params: ParamVec<'p> = found
            .names
            .iter()
            .zip(values.iter())
            .map(|(name, value)| (Arc::clone(name), *value))
            .collect();

        debug!(
            method = %method,
            path = %path,
            path_params = ?path_params,
            duration_us = match_duration.as_micros(),
            "Route matched"
        );

        Some(RouteMatch {
            payload: found.payload,
            path_params,
        })
    }

    /// Store for `method`, if any route was registered for it
    #[must_use]
    pub fn store(&self, method: &Method) -> Option<&Store<T, C>> {
        self.stores.get(method)
    }

    /// Largest parameter count registered for `method` (0 if none)
    #[must_use]
    pub fn max_params(&self, method: &Method) -> usize {
        self.stores.get(method).map_or(0, Store::max_params)
    }

    /// Methods with at least one registered route
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.stores.keys()
    }

    /// Registered (method, pattern) pairs in registration order
    #[must_use]
    pub fn routes(&self) -> &[(Method, String)] {
        &self.routes
    }

    /// Configuration the router was built with
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Log a summary of the routing table
    pub fn log_summary(&self) {
        let routes_summary: Vec<String> = self
            .routes
            .iter()
            .take(10)
            .map(|(method, pattern)| format!("{method} {pattern}"))
            .collect();
        let mut methods: Vec<&str> = self.stores.keys().map(Method::as_str).collect();
        methods.sort_unstable();

        info!(
            routes_count = self.routes.len(),
            methods = ?methods,
            routes_summary = ?routes_summary,
            priority = %self.config.priority,
            "Routing table loaded"
        );
    }

    /// Write all registered routes, followed by each method's tree, to `out`
    ///
    /// Useful for debugging and verifying that routes are loaded correctly.
    pub fn dump_routes<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "[routes] count={}", self.routes.len())?;
        for (method, pattern) in &self.routes {
            writeln!(out, "[route] {method} {pattern}")?;
        }
        let mut methods: Vec<&Method> = self.stores.keys().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        for method in methods {
            if let Some(store) = self.stores.get(method) {
                writeln!(
                    out,
                    "[tree] {method} nodes={} max_params={}",
                    store.node_count(),
                    store.max_params()
                )?;
                out.write_all(store.dump().as_bytes())?;
            }
        }
        Ok(())
    }
}

impl<T, C> Clone for Router<T, C>
where
    T: Clone,
    C: ConstraintCompiler + Clone,
    C::Matcher: Clone,
{
    fn clone(&self) -> Self {
        Self {
            stores: self.stores.clone(),
            routes: self.routes.clone(),
            config: self.config.clone(),
            compiler: self.compiler.clone(),
        }
    }
}

impl<T, C: ConstraintCompiler> std::fmt::Debug for Router<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("stores", &self.stores)
            .field("routes", &self.routes.len())
            .field("config", &self.config)
            .finish()
    }
}
