//! Per-request context and handler chain.
//!
//! # Responsibilities
//! - Carry the request method, path, headers and body
//! - Hold the parameters bound by the router
//! - Run the handler chain (middleware first, route handler last)
//! - Build the response (status, headers, body)
//!
//! # Design Decisions
//! - Handlers are synchronous; the async boundary is the HTTP adapter
//! - A middleware wraps the rest of the chain by calling `next()` itself

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::Serialize;

use crate::routing::Params;

/// A unit of work run against a request context.
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Wrap a closure as a [`HandlerFunc`].
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Request/response state for one request.
pub struct Context {
    method: String,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    request_id: Option<String>,

    params: Params,
    route_pattern: Option<String>,

    handlers: Vec<HandlerFunc>,
    index: usize,

    status: StatusCode,
    response_headers: HeaderMap,
    response_body: Bytes,
}

impl Context {
    /// Create a context for a request without headers or body.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            request_id: None,
            params: Params::new(),
            route_pattern: None,
            handlers: Vec::new(),
            index: 0,
            status: StatusCode::OK,
            response_headers: HeaderMap::new(),
            response_body: Bytes::new(),
        }
    }

    /// Attach the request headers; picks up `x-request-id` if present.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.request_id = headers
            .get(super::X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    // --- Request ---

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Value bound to `:name` or `*name` by the matched route.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Registration pattern of the matched route, if any.
    pub fn route_pattern(&self) -> Option<&str> {
        self.route_pattern.as_deref()
    }

    pub fn set_route_pattern(&mut self, pattern: impl Into<String>) {
        self.route_pattern = Some(pattern.into());
    }

    // --- Handler chain ---

    /// Append a handler to the end of the chain.
    pub fn push_handler(&mut self, handler: HandlerFunc) {
        self.handlers.push(handler);
    }

    /// Replace the chain with `handlers`, resetting its position.
    pub fn set_handlers(&mut self, handlers: Vec<HandlerFunc>) {
        self.handlers = handlers;
        self.index = 0;
    }

    /// Run every handler that has not run yet, in order.
    pub fn next(&mut self) {
        while self.index < self.handlers.len() {
            let handler = Arc::clone(&self.handlers[self.index]);
            self.index += 1;
            handler(self);
        }
    }

    /// Skip the rest of the chain and answer with a JSON error.
    pub fn fail(&mut self, status: StatusCode, message: &str) {
        self.index = self.handlers.len();
        self.json(status, &serde_json::json!({ "message": message }));
    }

    // --- Response ---

    pub fn status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn response_status(&self) -> StatusCode {
        self.status
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response_headers.insert(name, value);
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub fn response_body(&self) -> &Bytes {
        &self.response_body
    }

    pub fn string(&mut self, status: StatusCode, body: impl Into<String>) {
        self.write(status, "text/plain; charset=utf-8", Bytes::from(body.into()));
    }

    pub fn html(&mut self, status: StatusCode, html: impl Into<String>) {
        self.write(status, "text/html; charset=utf-8", Bytes::from(html.into()));
    }

    pub fn data(&mut self, status: StatusCode, data: impl Into<Bytes>) {
        self.status(status);
        self.response_body = data.into();
    }

    /// Serialize `value` as the JSON response body.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => self.write(status, "application/json", Bytes::from(body)),
            Err(e) => {
                tracing::error!(path = %self.path, error = %e, "Failed to serialize JSON response");
                self.string(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
            }
        }
    }

    fn write(&mut self, status: StatusCode, content_type: &'static str, body: Bytes) {
        self.set_header(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.status(status);
        self.response_body = body;
    }

    /// Split into the parts needed to build an HTTP response.
    pub fn into_response_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.status, self.response_headers, self.response_body)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("route_pattern", &self.route_pattern)
            .field("handlers", &self.handlers.len())
            .field("index", &self.index)
            .field("status", &self.status)
            .finish()
    }
}
