//! Trie-based HTTP request router.
//!
//! Routes map (method, path pattern) pairs to handlers. Patterns support
//! literal segments, `:name` parameters and a trailing `*name` wildcard.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::{handler, Context, Engine, HandlerFunc, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{Params, Router, TrieNode};
