//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router that forwards every request to the engine
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Translate between axum requests/responses and `Context`
//! - Record request metrics
//! - Serve until Ctrl+C or a shutdown broadcast

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::context::Context;
use crate::http::engine::Engine;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub max_body_size: usize,
}

/// HTTP front end for an [`Engine`].
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `engine`.
    ///
    /// The engine is frozen from here on: it is only reachable through `&`.
    pub fn new(config: RouterConfig, engine: Engine) -> Self {
        let state = AppState {
            engine: Arc::new(engine),
            max_body_size: config.limits.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        let max_body_size = state.max_body_size;
        // Outermost first: the request ID exists before the trace span opens.
        let middleware = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(RequestBodyLimitLayer::new(max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(middleware)
    }

    /// The axum router, e.g. for driving it directly with `tower::ServiceExt`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Turns the request into a `Context`, runs the engine and renders the result.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Failed to read request body");
            metrics::record_request(
                parts.method.as_str(),
                StatusCode::PAYLOAD_TOO_LARGE.as_u16(),
                metrics::route_label(None),
                start_time,
            );
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let mut ctx = Context::new(parts.method.as_str(), parts.uri.path())
        .with_headers(parts.headers)
        .with_body(body);

    tracing::debug!(
        request_id = ctx.request_id().unwrap_or("unknown"),
        method = %ctx.method(),
        path = %ctx.path(),
        "Dispatching request"
    );

    state.engine.handle(&mut ctx);

    metrics::record_request(
        ctx.method(),
        ctx.response_status().as_u16(),
        metrics::route_label(ctx.route_pattern()),
        start_time,
    );

    let (status, headers, body) = ctx.into_response_parts();
    (status, headers, body).into_response()
}

/// Wait for Ctrl+C or an explicit shutdown broadcast.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                // Fall back to the broadcast alone.
                let _ = shutdown.recv().await;
            }
        }
        _ = shutdown.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use ::metrics::{
        Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };
    use tower::ServiceExt;

    use crate::http::context::handler;

    /// Keeps the labels of every `router_requests_total` registration.
    #[derive(Default)]
    struct RequestLabels(Mutex<Vec<HashMap<String, String>>>);

    impl Recorder for RequestLabels {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            if key.name() == "router_requests_total" {
                let labels = key
                    .labels()
                    .map(|label| (label.key().to_string(), label.value().to_string()))
                    .collect();
                self.0.lock().unwrap().push(labels);
            }
            Counter::noop()
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    fn server(max_body_size: usize) -> HttpServer {
        let mut config = RouterConfig::default();
        config.limits.max_body_size = max_body_size;
        let mut engine = Engine::new();
        engine.get("/hello/:name", handler(|ctx| ctx.string(StatusCode::OK, "hi")));
        engine.post("/upload", handler(|ctx| ctx.status(StatusCode::NO_CONTENT)));
        HttpServer::new(config, engine)
    }

    /// Serve `request` on this thread and return the labels it was counted under.
    fn labels_for(server: &HttpServer, request: Request<Body>) -> HashMap<String, String> {
        let recorder = RequestLabels::default();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        ::metrics::with_local_recorder(&recorder, || {
            runtime.block_on(server.router().oneshot(request)).unwrap();
        });

        let mut recorded = recorder.0.into_inner().unwrap();
        assert_eq!(recorded.len(), 1);
        recorded.remove(0)
    }

    fn request(method: &str, uri: &str, body: Body) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(body).unwrap()
    }

    #[test]
    fn test_matched_request_counted_under_pattern() {
        let labels = labels_for(&server(1024), request("GET", "/hello/ann", Body::empty()));
        assert_eq!(labels["method"], "GET");
        assert_eq!(labels["status"], "200");
        assert_eq!(labels["route"], "/hello/:name");
    }

    #[test]
    fn test_unmatched_request_counted_as_none() {
        let labels = labels_for(&server(1024), request("GET", "/missing/path", Body::empty()));
        assert_eq!(labels["status"], "404");
        assert_eq!(labels["route"], "none");
    }

    #[test]
    fn test_oversized_body_counted_as_none() {
        let upload = request("POST", "/upload", Body::from(vec![0u8; 16]));
        let labels = labels_for(&server(8), upload);
        assert_eq!(labels["method"], "POST");
        assert_eq!(labels["status"], "413");
        assert_eq!(labels["route"], "none");
    }
}
