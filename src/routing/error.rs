//! Dispatch outcomes other than a completed response.

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::http::HttpError;
use crate::routing::matcher::PatternError;

/// Why a dispatch did not produce a response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route matched both method and path.
    #[error("route not found: {method} {path}")]
    NotFound { method: Method, path: String },

    /// A registered pattern is malformed.
    #[error("invalid route pattern: {0}")]
    Pattern(#[from] PatternError),

    /// A route names an operation its controller does not provide.
    #[error("controller `{controller}` has no operation `{operation}`")]
    UnknownOperation {
        controller: &'static str,
        operation: String,
    },

    /// A middleware failed; the handler did not run.
    #[error("middleware failed: {0}")]
    Middleware(#[source] HttpError),

    /// The handler failed.
    #[error("handler failed: {0}")]
    Handler(#[source] HttpError),
}

impl DispatchError {
    /// Status the hosting layer should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::NotFound { .. } => StatusCode::NOT_FOUND,
            DispatchError::Pattern(_) | DispatchError::UnknownOperation { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            DispatchError::Middleware(e) | DispatchError::Handler(e) => e.status(),
        }
    }

    /// Message safe to show a client. Configuration details stay in logs.
    pub fn public_message(&self) -> &str {
        match self {
            DispatchError::NotFound { .. } => "Route not found",
            DispatchError::Pattern(_) | DispatchError::UnknownOperation { .. } => {
                "Internal server error"
            }
            DispatchError::Middleware(e) | DispatchError::Handler(e) => e.message(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DispatchError::NotFound { .. })
    }

    /// True for errors caused by how routes were registered.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DispatchError::Pattern(_) | DispatchError::UnknownOperation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = DispatchError::NotFound {
            method: Method::POST,
            path: "/unknown".into(),
        };
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert!(not_found.is_not_found());
        assert_eq!(not_found.public_message(), "Route not found");

        let handler = DispatchError::Handler(HttpError::forbidden("Not your job"));
        assert_eq!(handler.status(), StatusCode::FORBIDDEN);
        assert_eq!(handler.public_message(), "Not your job");
        assert!(!handler.is_not_found());

        let op = DispatchError::UnknownOperation {
            controller: "JobController",
            operation: "missing".into(),
        };
        assert_eq!(op.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(op.is_configuration());
        assert_eq!(op.public_message(), "Internal server error");
    }
}
