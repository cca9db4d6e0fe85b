//! HTTP value carriers and hosting.
//!
//! # Data Flow
//! ```text
//! TCP connection (axum/hyper)
//!     → server.rs (layers: request id, trace, timeout, body limit)
//!     → request.rs (Incoming: method, path, query, headers, body)
//!     → routing dispatcher (Request + Response built per dispatch)
//!     → response.rs (status, headers, body) or error.rs (HttpError)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::HttpError;
pub use request::{Incoming, Request, X_REQUEST_ID};
pub use response::Response;
pub use server::HttpServer;
