//! Router core module - registration and the routing entry point.

use super::index::PatternIndex;
use super::registry::{CompiledMatcher, RouteRegistry};
use crate::dispatcher::{
    dispatch, Dispatch, ErrorCallback, Fallbacks, NotFoundCallback, Request, Response,
    RouteRequest,
};
use crate::error::RouterError;
use crate::method::{HandlersMap, HttpMethod, MethodTable};
use crate::runtime_config::RouterConfig;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::sync::Arc;
use tracing::info;

/// Lifecycle of a router instance.
///
/// `Empty -> Configured` on the first registration, `Configured -> Active`
/// once the combined pattern is compiled, and back to `Configured` whenever
/// a registration invalidates the compiled matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Empty,
    Configured,
    Active,
}

/// Regex alternation router.
///
/// All registered patterns are joined into one combined pattern
/// `(p0)|(p1)|...` and matched in a single pass; the regex engine's
/// leftmost-first alternation makes registration order the route priority.
///
/// The router is meant to be shared (`Arc<Router>`) between request-serving
/// threads. Registration and lazy recompilation take a write lock on the
/// registry; routing only holds a read lock long enough to clone the compiled
/// matcher snapshot, then matches and runs handlers without any lock.
///
/// # Example
///
/// ```rust
/// use altrouter::{handler, HandlersMap, Response, Router};
///
/// let router = Router::new();
/// let mut handlers = HandlersMap::new();
/// handlers.insert(
///     "GET".to_string(),
///     handler(|res, req| {
///         res.write(req.params().join(",").as_bytes());
///         Ok(())
///     }),
/// );
/// router.register(r"^/blog/(\d+)/post/(\d+)$", handlers).unwrap();
///
/// let request = http::Request::get("/blog/42/post/7").body(Vec::new()).unwrap();
/// let mut res = Response::new();
/// router.route(request, &mut res).unwrap();
/// assert_eq!(res.body(), b"42,7");
/// ```
pub struct Router {
    registry: RwLock<RouteRegistry>,
    fallbacks: RwLock<Fallbacks>,
    config: RouterConfig,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create an empty router with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            registry: RwLock::new(RouteRegistry::new()),
            fallbacks: RwLock::new(Fallbacks::default()),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register a pattern with a handler table keyed by method name.
    ///
    /// Every key must be one of `CONNECT`, `DELETE`, `GET`, `HEAD`, `OPTIONS`,
    /// `PATCH`, `POST`, `PUT`, `TRACE` (exact, case-sensitive). Any other key
    /// fails with [`RouterError::InvalidMethod`] and leaves the router untouched.
    ///
    /// The pattern is not compiled here; a malformed pattern surfaces on the
    /// next [`route`](Self::route) or [`compile`](Self::compile).
    ///
    /// Returns the route's slot (its 0-based registration position).
    pub fn register(&self, pattern: &str, handlers: HandlersMap) -> Result<usize, RouterError> {
        let table = MethodTable::from_map(handlers)?;
        Ok(self.register_table(pattern, table))
    }

    /// Register a pattern with an already-validated method table.
    pub fn register_table(&self, pattern: &str, handlers: MethodTable) -> usize {
        let methods = handlers.methods();
        let mut registry = self.registry.write();
        let slot = registry.register(pattern, handlers);
        info!(
            pattern = %pattern,
            route_slot = slot,
            methods = ?methods,
            routes_count = registry.len(),
            "Route registered"
        );
        slot
    }

    /// Compile the combined pattern now if it is stale.
    ///
    /// Useful at startup to surface malformed patterns before traffic arrives.
    pub fn compile(&self) -> Result<(), RouterError> {
        self.matcher().map(|_| ())
    }

    /// Route one request.
    ///
    /// Runs exactly one route handler, or one fallback, or nothing (route
    /// matched but has no handler for the method). Handler and not-found
    /// outcomes are never errors; only a combined pattern that fails to
    /// compile is.
    ///
    /// An empty router's combined pattern is the empty pattern, which matches
    /// every path without capturing anything: the request is
    /// [`Dispatch::Unresolved`], not not-found, and nothing is written. The
    /// same holds when the winning route's whole match is empty.
    pub fn route(&self, request: Request, res: &mut Response) -> Result<Dispatch, RouterError> {
        let matcher = self.matcher()?;
        let fallbacks = self.fallbacks.read().clone();
        Ok(dispatch(
            &matcher,
            &fallbacks,
            request,
            res,
            self.config.slow_match_threshold(),
        ))
    }

    /// Replace the not-found fallback.
    pub fn on_not_found<F>(&self, callback: F)
    where
        F: Fn(&mut Response, &Request) + Send + Sync + 'static,
    {
        let callback: NotFoundCallback = Arc::new(callback);
        self.fallbacks.write().set_not_found(callback);
    }

    /// Replace the error fallback.
    pub fn on_error<F>(&self, callback: F)
    where
        F: Fn(&mut Response, &RouteRequest, &anyhow::Error) + Send + Sync + 'static,
    {
        let callback: ErrorCallback = Arc::new(callback);
        self.fallbacks.write().set_error(callback);
    }

    #[must_use]
    pub fn state(&self) -> RouterState {
        let registry = self.registry.read();
        if registry.is_empty() {
            RouterState::Empty
        } else if registry.is_stale() {
            RouterState::Configured
        } else {
            RouterState::Active
        }
    }

    /// The combined alternation pattern text.
    #[must_use]
    pub fn combined_pattern(&self) -> String {
        self.registry.read().combined().to_string()
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.registry.read().len()
    }

    /// A copy of the current pattern index.
    #[must_use]
    pub fn index(&self) -> PatternIndex {
        self.registry.read().index().clone()
    }

    /// Registered patterns in slot order.
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        self.registry
            .read()
            .routes()
            .iter()
            .map(|r| r.pattern.to_string())
            .collect()
    }

    /// Log every route slot with its top-level group and methods.
    pub fn dump_routes(&self) {
        let registry = self.registry.read();
        info!(
            routes_count = registry.len(),
            combined = %registry.combined(),
            "Routing table"
        );
        for (top, entry) in registry.index().iter() {
            let Some(route) = registry.routes().get(entry.route_slot) else {
                continue;
            };
            let methods: Vec<HttpMethod> = route.handlers.methods();
            info!(
                route_slot = entry.route_slot,
                top_level_group = top,
                sub_groups = ?entry.sub_groups,
                pattern = %route.pattern,
                methods = ?methods,
                "Route"
            );
        }
    }

    /// The compiled matcher, compiling first if stale.
    fn matcher(&self) -> Result<Arc<CompiledMatcher>, RouterError> {
        if let Some(matcher) = self.registry.read().fresh() {
            return Ok(matcher);
        }
        let registry = self.registry.upgradable_read();
        if let Some(matcher) = registry.fresh() {
            return Ok(matcher);
        }
        let mut registry = RwLockUpgradableReadGuard::upgrade(registry);
        registry.compile(self.config.regex_size_limit)
    }
}
