//! Route registration, lookup and dispatch.
//!
//! # Responsibilities
//! - Keep one trie root per HTTP method
//! - Map `method-pattern` keys to handlers
//! - Bind `:param` and `*wildcard` values for a matched path
//! - Dispatch a request context to its handler or to the not-found handler
//!
//! # Design Decisions
//! - Built once at startup, read-only afterwards (lookups take `&self`)
//! - Unknown method and unmatched path are both a plain `None`
//! - Parameters are bound from the matched node's own pattern, so a route
//!   merged into another wildcard subtree binds its own parameter names

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::http::context::{Context, HandlerFunc};
use crate::routing::node::TrieNode;
use crate::routing::params::Params;
use crate::routing::pattern::{parse_pattern, split_segments, Segment};

/// Key under which a handler is stored, e.g. `GET-/p/:lang/doc`.
pub fn route_key(method: &str, pattern: &str) -> String {
    format!("{}-{}", method, pattern)
}

/// Method-aware trie router.
#[derive(Clone)]
pub struct Router<H = HandlerFunc> {
    roots: HashMap<String, TrieNode>,
    handlers: HashMap<String, H>,
}

impl<H> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("roots", &self.roots)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self {
            roots: HashMap::new(),
            handlers: HashMap::new(),
        }
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` requests matching `pattern`.
    pub fn add_route(&mut self, method: &str, pattern: &str, handler: H) {
        let segments = parse_pattern(pattern);
        self.roots
            .entry(method.to_string())
            .or_default()
            .insert(pattern, &segments, 0);
        self.handlers.insert(route_key(method, pattern), handler);

        tracing::debug!(method = %method, pattern = %pattern, "Route registered");
    }

    /// Look up the node matching `path` and bind its parameters.
    pub fn get_route(&self, method: &str, path: &str) -> Option<(&TrieNode, Params)> {
        let root = self.roots.get(method)?;
        let search_parts = split_segments(path);
        let node = root.search(&search_parts, 0)?;

        let mut params = Params::new();
        let pattern = node.pattern().unwrap_or_default();
        for (index, segment) in parse_pattern(pattern).iter().enumerate() {
            match segment {
                Segment::Param(name) => {
                    if let Some(value) = search_parts.get(index) {
                        params.insert(name.as_str(), *value);
                    }
                }
                Segment::Wildcard(name) => {
                    if !name.is_empty() {
                        let rest = search_parts.get(index..).unwrap_or_default();
                        params.insert(name.as_str(), rest.join("/"));
                    }
                    break;
                }
                Segment::Literal(_) => {}
            }
        }

        Some((node, params))
    }

    /// Every node of `method`'s trie that terminates a registered pattern.
    pub fn get_routes(&self, method: &str) -> Vec<&TrieNode> {
        self.roots
            .get(method)
            .map(TrieNode::traverse)
            .unwrap_or_default()
    }

    /// Registered patterns for `method`, in trie order.
    pub fn patterns(&self, method: &str) -> Vec<&str> {
        self.get_routes(method)
            .into_iter()
            .filter_map(TrieNode::pattern)
            .collect()
    }

    /// Methods that have at least one registration.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    /// Handler stored for an exact `method` and registration `pattern`.
    pub fn handler(&self, method: &str, pattern: &str) -> Option<&H> {
        self.handlers.get(&route_key(method, pattern))
    }
}

impl Router<HandlerFunc> {
    /// Resolve the context's route, append its handler (or the not-found
    /// handler) to the chain and run the chain.
    pub fn handle(&self, ctx: &mut Context) {
        let resolved = self.get_route(ctx.method(), ctx.path()).and_then(|(node, params)| {
            let pattern = node.pattern()?;
            let handler = self.handler(ctx.method(), pattern)?;
            Some((pattern.to_string(), params, Arc::clone(handler)))
        });

        match resolved {
            Some((pattern, params, handler)) => {
                ctx.set_params(params);
                ctx.set_route_pattern(pattern);
                ctx.push_handler(handler);
            }
            None => ctx.push_handler(not_found()),
        }

        ctx.next();
    }
}

/// Terminal handler used when no route matches.
pub fn not_found() -> HandlerFunc {
    Arc::new(|ctx: &mut Context| {
        let body = format!("404 NOT FOUND: {}\n", ctx.path());
        ctx.string(StatusCode::NOT_FOUND, body);
    })
}
