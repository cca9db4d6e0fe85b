//! Request dispatch.
//!
//! # Responsibilities
//! - Find the first route matching both method and path
//! - Build the per-dispatch `Request` and `Response`
//! - Run the route's middleware chain, then its handler
//! - Report not-found, configuration and chain failures distinctly
//!
//! # Design Decisions
//! - Linear scan in registration order; first match wins, never the most specific
//! - Method is checked before the pattern, so only candidate patterns compile
//! - A malformed pattern fails the dispatch instead of being skipped
//! - No fallthrough once a route is selected, even when its handler fails
//! - No retries or recovery at this layer

use std::time::Instant;

use axum::http::Method;
use tracing::{debug, error, warn};

use crate::http::{Incoming, Request, Response};
use crate::middleware::Flow;
use crate::observability::metrics;
use crate::routing::error::DispatchError;
use crate::routing::handler::HandlerError;
use crate::routing::matcher::PathParams;
use crate::routing::router::{Route, Router};

impl Router {
    /// Dispatch a bare method and path.
    pub fn dispatch(&self, method: Method, path: &str) -> Result<Response, DispatchError> {
        self.dispatch_request(Incoming::new(method, path))
    }

    /// Dispatch a request handed over by the hosting layer.
    pub fn dispatch_request(&self, mut incoming: Incoming) -> Result<Response, DispatchError> {
        let start = Instant::now();
        let request_id = incoming
            .request_id
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
            .clone();
        let span = tracing::debug_span!(
            "dispatch",
            request_id = %request_id,
            method = %incoming.method,
            path = %incoming.path
        );
        let _enter = span.enter();

        let (route, params) = match self.find(&incoming.method, &incoming.path) {
            Ok(Some(found)) => found,
            Ok(None) => {
                warn!("No route matched");
                metrics::record_not_found(&incoming.method);
                return Err(DispatchError::NotFound {
                    method: incoming.method,
                    path: incoming.path,
                });
            }
            Err(err) => {
                error!(error = %err, "Route pattern failed to compile");
                return Err(err);
            }
        };

        debug!(route = %route.pattern(), params = ?params, "Route matched");

        let mut req = Request::new(incoming, route.pattern(), params);
        let mut res = Response::new();
        let outcome = run_route(route, &mut req, &mut res);

        let status = match &outcome {
            Ok(()) => res.status(),
            Err(err) => err.status(),
        };
        metrics::record_dispatch(req.method(), route.pattern(), status.as_u16(), start);

        outcome.map(|()| res)
    }

    /// First route whose method and pattern both match.
    fn find(
        &self,
        method: &Method,
        path: &str,
    ) -> Result<Option<(&Route, PathParams)>, DispatchError> {
        for route in self.routes() {
            if route.method() != method {
                continue;
            }
            if let Some(params) = route.match_path(path)? {
                return Ok(Some((route, params)));
            }
        }
        Ok(None)
    }
}

fn run_route(route: &Route, req: &mut Request, res: &mut Response) -> Result<(), DispatchError> {
    for (index, middleware) in route.middlewares().iter().enumerate() {
        match middleware.handle(req, res) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Halt) => {
                debug!(middleware = index, status = %res.status(), "Middleware halted chain");
                return Ok(());
            }
            Err(err) => {
                debug!(middleware = index, error = %err, "Middleware failed");
                return Err(DispatchError::Middleware(err));
            }
        }
    }

    let target = route.handler();
    target.invoke(req, res).map_err(|err| match err {
        HandlerError::Http(err) => DispatchError::Handler(err),
        HandlerError::UnknownOperation(operation) => {
            error!(
                controller = target.controller_name(),
                operation = %operation,
                "Handler operation not found"
            );
            DispatchError::UnknownOperation {
                controller: target.controller_name(),
                operation,
            }
        }
    })
}
