//! Per-route middleware.
//!
//! # Data Flow
//! ```text
//! Matched route
//!     → middleware factory (fresh instances per dispatch)
//!     → handle(req, res) in registration order
//!         Continue → next middleware
//!         Halt     → stop; response returned as written
//!         Err      → dispatch fails with the middleware error
//!     → handler
//! ```
//!
//! # Design Decisions
//! - Termination is an explicit return value, never inferred from response state
//! - Middleware may annotate the request through its extensions

pub mod auth;
pub mod logging;

pub use auth::{AuthMiddleware, RoleMiddleware, TokenRegistry, UserContext};
pub use logging::RequestLogMiddleware;

use crate::http::{HttpError, Request, Response};

/// What the chain does after a middleware returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next middleware, or the handler after the last one.
    Continue,
    /// Stop here. Neither later middleware nor the handler run.
    Halt,
}

/// A per-request step executed before the handler.
pub trait Middleware {
    fn handle(&self, req: &mut Request, res: &mut Response) -> Result<Flow, HttpError>;
}

impl<F> Middleware for F
where
    F: Fn(&mut Request, &mut Response) -> Result<Flow, HttpError>,
{
    fn handle(&self, req: &mut Request, res: &mut Response) -> Result<Flow, HttpError> {
        self(req, res)
    }
}
