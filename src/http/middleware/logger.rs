//! Request logging middleware.

use std::time::Instant;

use crate::http::context::{handler, Context, HandlerFunc};
use crate::observability::metrics::route_label;

/// Logs method, path, status and latency once the rest of the chain ran.
pub fn logger() -> HandlerFunc {
    handler(|ctx: &mut Context| {
        let start = Instant::now();
        ctx.next();
        tracing::info!(
            request_id = ctx.request_id().unwrap_or("unknown"),
            method = %ctx.method(),
            path = %ctx.path(),
            route = route_label(ctx.route_pattern()),
            status = ctx.response_status().as_u16(),
            elapsed = ?start.elapsed(),
            "Request handled"
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_logger_runs_downstream_handlers() {
        let mut ctx = Context::new("GET", "/");
        ctx.push_handler(logger());
        ctx.push_handler(handler(|ctx| ctx.string(StatusCode::ACCEPTED, "ok")));
        ctx.next();
        assert_eq!(ctx.response_status(), StatusCode::ACCEPTED);
    }
}
