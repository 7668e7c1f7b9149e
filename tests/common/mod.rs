//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use trie_router::config::{RouteConfig, RouterConfig};
use trie_router::http::HttpServer;
use trie_router::lifecycle::{build_engine, Shutdown};

/// A route answering with the JSON echo of its pattern and params.
pub fn echo_route(method: &str, pattern: &str) -> RouteConfig {
    RouteConfig {
        method: method.to_string(),
        pattern: pattern.to_string(),
        status: 200,
        body: None,
    }
}

/// A route answering with a fixed plain-text body.
#[allow(dead_code)]
pub fn text_route(method: &str, pattern: &str, status: u16, body: &str) -> RouteConfig {
    RouteConfig {
        method: method.to_string(),
        pattern: pattern.to_string(),
        status,
        body: Some(body.to_string()),
    }
}

/// Default config carrying `routes`.
pub fn config_with(routes: Vec<RouteConfig>) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.routes = routes;
    config
}

/// Start a server on an ephemeral port; returns its address.
#[allow(dead_code)]
pub async fn start_server(config: RouterConfig, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let engine = build_engine(&config);
    let server = HttpServer::new(config, engine);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}
