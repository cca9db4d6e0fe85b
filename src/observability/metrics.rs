//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): matched dispatches by method, route, status
//! - `router_dispatch_duration_seconds` (histogram): time from lookup to response
//! - `router_not_found_total` (counter): dispatches with no matching route, by method
//!
//! # Design Decisions
//! - Labels use the route pattern, never the concrete path (bounded cardinality)
//! - Exporter is optional; without it the macros record nothing

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a dispatch that selected `route`.
pub fn record_dispatch(method: &Method, route: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let route = route.to_string();
    ::metrics::counter!(
        "router_dispatch_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "router_dispatch_duration_seconds",
        "method" => method,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a dispatch that matched no route.
pub fn record_not_found(method: &Method) {
    ::metrics::counter!("router_not_found_total", "method" => method.to_string()).increment(1);
}
