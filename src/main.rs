//! Trie router server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ http::server ──▶ http::engine ──▶ routing::Router
//!                    (request id,     (group            (trie search,
//!                     limits, trace)   middleware)        param binding)
//!                                                              │
//!     Client Response                                          ▼
//!     ◀───────────── http::server ◀── http::context ◀── route handler
//!                                     (handler chain)    or 404
//! ```
//!
//! Usage: `trie-router [CONFIG.toml]`. Without a path the defaults are used
//! and no routes are registered.

use std::path::PathBuf;

use tokio::net::TcpListener;

use trie_router::config::{load_config, RouterConfig};
use trie_router::http::HttpServer;
use trie_router::lifecycle::{build_engine, Shutdown};
use trie_router::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => load_config(&path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("trie-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Every route is registered before anything is bound.
    let engine = build_engine(&config);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, engine);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
