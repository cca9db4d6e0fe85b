//! Request logging middleware.

use tracing::debug;

use crate::http::{HttpError, Request, Response};
use crate::middleware::{Flow, Middleware};

/// Logs each matched request. Never halts.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLogMiddleware;

impl Middleware for RequestLogMiddleware {
    fn handle(&self, req: &mut Request, _res: &mut Response) -> Result<Flow, HttpError> {
        debug!(
            request_id = %req.request_id(),
            method = %req.method(),
            path = %req.path(),
            route = %req.pattern(),
            "Handling request"
        );
        Ok(Flow::Continue)
    }
}
