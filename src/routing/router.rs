//! Route table and registration.
//!
//! # Responsibilities
//! - Store routes in registration order
//! - Register routes per method (`get`, `post`, `put`, `delete`)
//! - Compile patterns on first use and cache the result
//! - Validate every pattern up front when asked
//!
//! # Design Decisions
//! - Append-only while building (`&mut self`), read-only once shared (`Arc<Router>`)
//! - No duplicate detection; earlier registrations shadow later ones
//! - Handler and middleware factories are stored, not called, at registration

use std::fmt;
use std::sync::{Arc, OnceLock};

use axum::http::Method;

use crate::middleware::Middleware;
use crate::routing::handler::HandlerTarget;
use crate::routing::matcher::{PathParams, PathPattern, PatternError};

/// Produces the handler for a matched route.
pub type HandlerFactory = Arc<dyn Fn() -> HandlerTarget + Send + Sync>;

/// Produces the middleware chain for a matched route.
pub type MiddlewareFactory = Arc<dyn Fn() -> Vec<Box<dyn Middleware>> + Send + Sync>;

fn no_middleware() -> Vec<Box<dyn Middleware>> {
    Vec::new()
}

/// A registered route.
pub struct Route {
    method: Method,
    pattern: String,
    compiled: OnceLock<Result<PathPattern, PatternError>>,
    handler: HandlerFactory,
    middleware: MiddlewareFactory,
}

impl Route {
    fn new(method: Method, pattern: String, handler: HandlerFactory) -> Self {
        Self {
            method,
            pattern,
            compiled: OnceLock::new(),
            handler,
            middleware: Arc::new(no_middleware),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled pattern, compiling it on first call.
    pub fn compiled(&self) -> Result<&PathPattern, PatternError> {
        self.compiled
            .get_or_init(|| PathPattern::compile(&self.pattern))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Captured params if `path` matches this route's pattern.
    pub fn match_path(&self, path: &str) -> Result<Option<PathParams>, PatternError> {
        Ok(self.compiled()?.captures(path))
    }

    pub(crate) fn handler(&self) -> HandlerTarget {
        (self.handler)()
    }

    pub(crate) fn middlewares(&self) -> Vec<Box<dyn Middleware>> {
        (self.middleware)()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Handle on the route just registered.
pub struct RouteBuilder<'a> {
    route: &'a mut Route,
}

impl RouteBuilder<'_> {
    /// Attach the middleware factory for this route.
    pub fn with_middleware<M>(self, factory: M) -> Self
    where
        M: Fn() -> Vec<Box<dyn Middleware>> + Send + Sync + 'static,
    {
        self.route.middleware = Arc::new(factory);
        self
    }
}

/// Ordered route table.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. The pattern is not checked here.
    pub fn add_route<H>(
        &mut self,
        method: Method,
        pattern: impl Into<String>,
        handler: H,
    ) -> RouteBuilder<'_>
    where
        H: Fn() -> HandlerTarget + Send + Sync + 'static,
    {
        let index = self.routes.len();
        self.routes
            .push(Route::new(method, pattern.into(), Arc::new(handler)));
        RouteBuilder {
            route: &mut self.routes[index],
        }
    }

    pub fn get<H>(&mut self, pattern: impl Into<String>, handler: H) -> RouteBuilder<'_>
    where
        H: Fn() -> HandlerTarget + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, handler)
    }

    pub fn post<H>(&mut self, pattern: impl Into<String>, handler: H) -> RouteBuilder<'_>
    where
        H: Fn() -> HandlerTarget + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, handler)
    }

    pub fn put<H>(&mut self, pattern: impl Into<String>, handler: H) -> RouteBuilder<'_>
    where
        H: Fn() -> HandlerTarget + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, handler)
    }

    pub fn delete<H>(&mut self, pattern: impl Into<String>, handler: H) -> RouteBuilder<'_>
    where
        H: Fn() -> HandlerTarget + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, handler)
    }

    /// Routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Compile every pattern, returning all failures.
    pub fn validate(&self) -> Result<(), Vec<PatternError>> {
        let errors: Vec<PatternError> = self
            .routes
            .iter()
            .filter_map(|route| route.compiled().err())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}
