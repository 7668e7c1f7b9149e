//! Engine and route groups.
//!
//! # Responsibilities
//! - Own the router and the registered groups
//! - Register routes under a group's path prefix
//! - Pick the middleware of every group whose prefix matches a request path
//!
//! # Design Decisions
//! - Registration needs `&mut Engine`; serving only needs `&Engine`, so once
//!   the engine is shared behind an `Arc` the route table is frozen
//! - Middleware order follows group creation order, then `use` order

use axum::http::Method;

use crate::http::context::{Context, HandlerFunc};
use crate::routing::Router;

#[derive(Clone, Default)]
struct GroupEntry {
    prefix: String,
    middlewares: Vec<HandlerFunc>,
}

/// Owner of the route table and its groups.
#[derive(Clone)]
pub struct Engine {
    router: Router,
    groups: Vec<GroupEntry>,
}

impl Engine {
    /// Create an engine with an empty root group.
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            groups: vec![GroupEntry::default()],
        }
    }

    /// Read access to the underlying router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Create a top-level group under `prefix`.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let index = self.push_group(prefix.to_string());
        RouterGroup {
            engine: self,
            index,
        }
    }

    /// Add middleware that runs for every request.
    pub fn use_middleware(&mut self, middleware: HandlerFunc) {
        self.root().use_middleware(middleware);
    }

    pub fn add_route(&mut self, method: &str, pattern: &str, handler: HandlerFunc) {
        self.root().add_route(method, pattern, handler);
    }

    pub fn get(&mut self, pattern: &str, handler: HandlerFunc) {
        self.add_route(Method::GET.as_str(), pattern, handler);
    }

    pub fn post(&mut self, pattern: &str, handler: HandlerFunc) {
        self.add_route(Method::POST.as_str(), pattern, handler);
    }

    /// Run the matching middleware and the route (or not-found) handler.
    pub fn handle(&self, ctx: &mut Context) {
        let middlewares = self
            .groups
            .iter()
            .filter(|group| ctx.path().starts_with(&group.prefix))
            .flat_map(|group| group.middlewares.iter().cloned())
            .collect();
        ctx.set_handlers(middlewares);
        self.router.handle(ctx);
    }

    fn push_group(&mut self, prefix: String) -> usize {
        self.groups.push(GroupEntry {
            prefix,
            middlewares: Vec::new(),
        });
        self.groups.len() - 1
    }

    fn root(&mut self) -> RouterGroup<'_> {
        RouterGroup {
            engine: self,
            index: 0,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefixes: Vec<_> = self.groups.iter().map(|g| g.prefix.as_str()).collect();
        f.debug_struct("Engine")
            .field("router", &self.router)
            .field("groups", &prefixes)
            .finish()
    }
}

/// A set of routes sharing a path prefix and middleware.
pub struct RouterGroup<'a> {
    engine: &'a mut Engine,
    index: usize,
}

impl RouterGroup<'_> {
    /// The full prefix of this group.
    pub fn prefix(&self) -> &str {
        &self.engine.groups[self.index].prefix
    }

    /// Create a nested group; its prefix is appended to this group's prefix.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let prefix = format!("{}{}", self.prefix(), prefix);
        let index = self.engine.push_group(prefix);
        RouterGroup {
            engine: &mut *self.engine,
            index,
        }
    }

    pub fn use_middleware(&mut self, middleware: HandlerFunc) -> &mut Self {
        self.engine.groups[self.index].middlewares.push(middleware);
        self
    }

    pub fn add_route(&mut self, method: &str, pattern: &str, handler: HandlerFunc) -> &mut Self {
        let full = format!("{}{}", self.prefix(), pattern);
        self.engine.router.add_route(method, &full, handler);
        self
    }

    pub fn get(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::GET.as_str(), pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::POST.as_str(), pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::PUT.as_str(), pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::DELETE.as_str(), pattern, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::context::handler;
    use axum::http::StatusCode;
    use std::sync::{Arc, Mutex};

    fn tag(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> HandlerFunc {
        let log = Arc::clone(log);
        handler(move |_| log.lock().unwrap().push(name.to_string()))
    }

    fn run(engine: &Engine, method: &str, path: &str) -> Context {
        let mut ctx = Context::new(method, path);
        engine.handle(&mut ctx);
        ctx
    }

    #[test]
    fn test_group_prefixes_routes() {
        let mut engine = Engine::new();
        {
            let mut v1 = engine.group("/v1");
            v1.get("/hello/:name", handler(|ctx| {
                let name = ctx.param("name").unwrap_or_default().to_string();
                ctx.string(StatusCode::OK, format!("hello {}", name));
            }));
            let mut admin = v1.group("/admin");
            assert_eq!(admin.prefix(), "/v1/admin");
            admin.post("/users", handler(|ctx| ctx.status(StatusCode::CREATED)));
        }

        assert_eq!(engine.router().patterns("GET"), vec!["/v1/hello/:name"]);
        assert_eq!(engine.router().patterns("POST"), vec!["/v1/admin/users"]);

        let ctx = run(&engine, "GET", "/v1/hello/ann");
        assert_eq!(&ctx.response_body()[..], b"hello ann");
        assert_eq!(ctx.route_pattern(), Some("/v1/hello/:name"));

        let ctx = run(&engine, "POST", "/v1/admin/users");
        assert_eq!(ctx.response_status(), StatusCode::CREATED);
    }

    #[test]
    fn test_middleware_selected_by_path_prefix() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut engine = Engine::new();
        engine.use_middleware(tag(&log, "global"));
        engine.group("/v2").use_middleware(tag(&log, "v2"));
        engine.group("/v1").use_middleware(tag(&log, "v1")).get("/a", tag(&log, "route"));

        run(&engine, "GET", "/v1/a");
        assert_eq!(*log.lock().unwrap(), vec!["global", "v1", "route"]);

        log.lock().unwrap().clear();
        let ctx = run(&engine, "GET", "/v2/missing");
        assert_eq!(*log.lock().unwrap(), vec!["global", "v2"]);
        assert_eq!(ctx.response_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_group_method_helpers() {
        let mut engine = Engine::new();
        engine
            .group("/items")
            .put("/:id", handler(|ctx| ctx.status(StatusCode::ACCEPTED)))
            .delete("/:id", handler(|ctx| ctx.status(StatusCode::NO_CONTENT)));

        let ctx = run(&engine, "PUT", "/items/7");
        assert_eq!(ctx.response_status(), StatusCode::ACCEPTED);
        assert_eq!(ctx.param("id"), Some("7"));

        let ctx = run(&engine, "DELETE", "/items/7");
        assert_eq!(ctx.response_status(), StatusCode::NO_CONTENT);

        let ctx = run(&engine, "GET", "/items/7");
        assert_eq!(ctx.response_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_body() {
        let engine = Engine::new();
        let ctx = run(&engine, "GET", "/nowhere");
        assert_eq!(ctx.response_status(), StatusCode::NOT_FOUND);
        assert_eq!(&ctx.response_body()[..], b"404 NOT FOUND: /nowhere\n");
        assert_eq!(ctx.route_pattern(), None);
    }
}
