//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Host the route table behind an Axum app
//! - Wire up layers (request ID, tracing, timeout, body limit)
//! - Turn each transport request into an `Incoming` and dispatch it
//! - Render dispatch errors as JSON error bodies
//! - Serve until the shutdown signal fires

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::{HeaderMap, Method, Uri},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::request::{Incoming, X_REQUEST_ID};
use crate::http::response::Response;
use crate::routing::Router as RouteTable;

/// HTTP server hosting a route table.
pub struct HttpServer {
    app: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server for a fully registered route table.
    pub fn new(config: AppConfig, routes: Arc<RouteTable>) -> Self {
        let app = build_app(&config, routes);
        Self { app, config }
    }

    /// The Axum app, for driving requests without a socket.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum app with all middleware layers.
#[allow(deprecated)]
pub fn build_app(config: &AppConfig, routes: Arc<RouteTable>) -> Router {
    Router::new()
        .fallback(dispatch_handler)
        .with_state(routes)
        .layer(DefaultBodyLimit::max(config.limits.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Hand every request to the route table.
async fn dispatch_handler(
    State(routes): State<Arc<RouteTable>>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let incoming = Incoming {
        method,
        path: uri.path().to_string(),
        query,
        headers,
        body,
        request_id,
    };

    match routes.dispatch_request(incoming) {
        Ok(response) => response.into_response(),
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                tracing::error!(error = %err, "Dispatch failed");
            } else {
                tracing::debug!(error = %err, "Dispatch rejected");
            }
            let mut response = Response::new();
            response.write_error(status, err.public_message());
            response.into_response()
        }
    }
}
