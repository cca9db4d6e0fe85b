//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and hosting layer produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (dispatch counters, latency histograms)
//!
//! Consumers:
//!     → stdout (text or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID is attached to every dispatch span
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
