//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn the configured route table into a ready `Engine`
//! - Install the global middleware
//! - Publish per-method route counts
//!
//! # Design Decisions
//! - Routes register in file order, so wildcard merges are reproducible
//! - Fail fast: config errors surface before anything is bound

use axum::http::StatusCode;
use serde_json::json;

use crate::config::{RouteConfig, RouterConfig};
use crate::http::context::{handler, HandlerFunc};
use crate::http::engine::Engine;
use crate::http::middleware::logger;
use crate::observability::metrics;

/// Build the engine described by `config`.
pub fn build_engine(config: &RouterConfig) -> Engine {
    let mut engine = Engine::new();
    engine.use_middleware(logger());

    for route in &config.routes {
        if route.method.bytes().any(|b| b.is_ascii_lowercase()) {
            tracing::warn!(
                method = %route.method,
                pattern = %route.pattern,
                "Route method is not uppercase and matches only that exact spelling"
            );
        }
        engine.add_route(&route.method, &route.pattern, route_handler(route));
    }

    for method in engine.router().methods() {
        let count = engine.router().get_routes(method).len();
        metrics::record_route_count(method, count);
        tracing::info!(method = %method, routes = count, "Routes registered");
    }

    engine
}

/// Handler for a configured route.
///
/// Routes with a body answer with it as plain text; others echo the matched
/// pattern and parameters as JSON.
pub fn route_handler(route: &RouteConfig) -> HandlerFunc {
    let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::OK);
    match route.body.clone() {
        Some(body) => handler(move |ctx| ctx.string(status, body.clone())),
        None => handler(move |ctx| {
            let payload = json!({
                "method": ctx.method(),
                "path": ctx.path(),
                "pattern": ctx.route_pattern(),
                "params": ctx.params(),
            });
            ctx.json(status, &payload);
        }),
    }
}
