//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, request ID, limits, timeout, tracing)
//!     → context.rs (request wrapped in a Context)
//!     → engine.rs (group middleware selected by path prefix)
//!     → routing::Router::handle (route handler or 404 appended, chain run)
//!     → server.rs (Context rendered as the HTTP response)
//! ```

pub mod context;
pub mod engine;
pub mod middleware;
pub mod request;
pub mod server;

pub use context::{handler, Context, HandlerFunc};
pub use engine::{Engine, RouterGroup};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
