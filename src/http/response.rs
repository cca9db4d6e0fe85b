//! Response values written by middleware and handlers.
//!
//! # Responsibilities
//! - Hold status, headers and body for one dispatch
//! - Provide JSON/text writers with the right content type
//! - Render structured error bodies
//! - Convert into an axum response for the hosting layer
//!
//! # Design Decisions
//! - Created once per dispatch (200, empty body) and mutated in place
//! - Error bodies share one shape: `{"error": ..., "status": ...}`

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::http::error::HttpError;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    status: u16,
}

/// A response under construction.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Write a serialized JSON body.
    pub fn json<T: Serialize + ?Sized>(
        &mut self,
        status: StatusCode,
        value: &T,
    ) -> Result<(), HttpError> {
        let body = serde_json::to_vec(value)
            .map_err(|e| HttpError::internal(format!("Failed to encode response: {e}")))?;
        self.status = status;
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Bytes::from(body);
        Ok(())
    }

    /// Write a plain text body.
    pub fn text(&mut self, status: StatusCode, body: impl Into<String>) {
        self.status = status;
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        self.body = Bytes::from(body.into());
    }

    /// Render `error` as the standard JSON error body.
    pub fn error(&mut self, error: &HttpError) {
        self.write_error(error.status(), error.message());
    }

    pub(crate) fn write_error(&mut self, status: StatusCode, message: &str) {
        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };
        if self.json(status, &body).is_err() {
            self.text(status, message);
        }
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let mut response = axum::response::Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
