//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (startup):
//!     get/post/put/delete(pattern, handler factory)
//!     → router.rs (append to ordered table)
//!     → [optional] validate() compiles every pattern
//!
//! Dispatch (per request):
//!     method + path
//!     → dispatcher.rs (scan table in order)
//!     → matcher.rs (compiled pattern, captured params)
//!     → middleware chain → handler.rs (controller operation)
//!     → Response, or DispatchError (error.rs)
//! ```
//!
//! # Design Decisions
//! - Table is immutable once shared; dispatch needs only `&Router`
//! - First match wins in registration order, no specificity ranking
//! - Deterministic: same input always selects the same route

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod matcher;
pub mod router;

pub use error::DispatchError;
pub use handler::{Controller, HandlerError, HandlerTarget};
pub use matcher::{PathParams, PathPattern, PatternError};
pub use router::{HandlerFactory, MiddlewareFactory, Route, RouteBuilder, Router};
