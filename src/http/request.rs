//! Request values handed to middleware and handlers.
//!
//! # Responsibilities
//! - Carry what the hosting layer extracted from the transport (`Incoming`)
//! - Record the matched route pattern and captured path parameters
//! - Give typed access to params, query, headers and JSON bodies
//! - Hold per-request annotations written by middleware (extensions)
//!
//! # Design Decisions
//! - One `Request` per dispatch, passed by `&mut` through the chain
//! - Parsing failures are `400 Bad Request`, not panics

use std::collections::HashMap;
use std::str::FromStr;

use axum::body::Bytes;
use axum::http::{Extensions, HeaderMap, HeaderName, HeaderValue, Method};
use serde::de::DeserializeOwned;

use crate::http::error::HttpError;
use crate::routing::matcher::PathParams;

/// Header used to correlate a request across logs.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The raw request as produced by the hosting layer.
#[derive(Debug, Clone)]
pub struct Incoming {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub request_id: Option<String>,
}

impl Incoming {
    /// A bare request with only method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            request_id: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header. Invalid names or values are skipped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_str(name),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// A request bound to the route that matched it.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    pattern: String,
    params: PathParams,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Bytes,
    request_id: String,
    extensions: Extensions,
}

impl Request {
    /// Bind an incoming request to a route pattern and its captured params.
    pub fn new(incoming: Incoming, pattern: impl Into<String>, params: PathParams) -> Self {
        let request_id = incoming
            .request_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Self {
            method: incoming.method,
            path: incoming.path,
            pattern: pattern.into(),
            params,
            query: incoming.query,
            headers: incoming.headers,
            body: incoming.body,
            request_id,
            extensions: Extensions::new(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The concrete request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The pattern of the route that matched, e.g. `/applications/{id}`.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Parse a path parameter, failing with 400 when missing or malformed.
    pub fn param_as<T: FromStr>(&self, name: &str) -> Result<T, HttpError> {
        let raw = self
            .param(name)
            .ok_or_else(|| HttpError::bad_request(format!("Missing path parameter `{name}`")))?;
        raw.parse()
            .map_err(|_| HttpError::bad_request(format!("Invalid path parameter `{name}`")))
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Parse a query parameter, using `default` when it is absent.
    pub fn query_as<T: FromStr>(&self, name: &str, default: T) -> Result<T, HttpError> {
        match self.query(name) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| HttpError::bad_request(format!("Invalid query parameter `{name}`"))),
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| HttpError::bad_request(format!("Invalid JSON body: {e}")))
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}
