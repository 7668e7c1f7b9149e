//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status, route
//! - `router_request_duration_seconds` (histogram): latency distribution
//! - `router_registered_routes` (gauge): registered patterns per method
//!
//! # Design Decisions
//! - Route label is the registration pattern, never the raw path, to keep
//!   label cardinality bounded
//! - Recording without an installed exporter is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

/// Route label of requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "none";

/// Route label for a request: its registration pattern, or [`UNMATCHED_ROUTE`].
pub fn route_label(pattern: Option<&str>) -> &str {
    pattern.unwrap_or(UNMATCHED_ROUTE)
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    let route = route.to_string();

    counter!(
        "router_requests_total",
        "method" => method.clone(),
        "status" => status.clone(),
        "route" => route.clone()
    )
    .increment(1);

    histogram!(
        "router_request_duration_seconds",
        "method" => method,
        "status" => status,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());
}

/// Publish how many patterns are registered for `method`.
pub fn record_route_count(method: &str, count: usize) {
    gauge!("router_registered_routes", "method" => method.to_string()).set(count as f64);
}
