//! Job-application backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum (server.rs: request id, trace, timeout, body limit)
//!                          │
//!                          ▼
//!                     routing::Router::dispatch_request
//!                          │  first route matching method + path
//!                          ▼
//!                     middleware chain (log → auth → role)
//!                          │  Continue / Halt / Err
//!                          ▼
//!                     controller operation ──▶ ApplicationStore
//!                          │
//!     Client Response      ▼
//!     ◀────────────── Response or DispatchError (JSON error body)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use jobboard_router::app::{self, store::{ApplicationStore, MemoryStore}};
use jobboard_router::config::{load_config, AppConfig};
use jobboard_router::lifecycle::{signals, Shutdown};
use jobboard_router::middleware::TokenRegistry;
use jobboard_router::observability::{logging, metrics};
use jobboard_router::{HttpServer, Router};

#[derive(Parser)]
#[command(name = "jobboard-router")]
#[command(about = "Job-application API server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the route table and exit.
    #[arg(long)]
    print_routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("jobboard-router v{} starting", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn ApplicationStore> = Arc::new(MemoryStore::seeded());
    let tokens = Arc::new(TokenRegistry::from_config(&config.auth));
    if tokens.is_empty() {
        tracing::warn!("No API tokens configured; protected routes will answer 401");
    }

    let mut router = Router::new();
    app::register_routes(&mut router, store, tokens);
    if let Err(errors) = router.validate() {
        for error in &errors {
            tracing::error!(error = %error, "Invalid route pattern");
        }
        return Err(format!("{} invalid route pattern(s)", errors.len()).into());
    }

    if cli.print_routes {
        for route in router.routes() {
            println!("{:<7} {}", route.method(), route.pattern());
        }
        return Ok(());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = router.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown));

    let server = HttpServer::new(config, Arc::new(router));
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
