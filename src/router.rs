//! Radix-tree request router and middleware stack.
//!
//! One tree per HTTP method, O(path-length) lookup. The router also owns
//! the ordered middleware stack: every exchange — matched or not — runs
//! through the full stack, so a logging middleware observes 404s exactly
//! like hits. Build the router once at startup; pass it to
//! [`Server::serve`](crate::Server::serve).

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Each registration method returns `self` so calls chain naturally:
///
/// ```rust,no_run
/// # use tapline::{ExchangeLogger, Request, Response, Router};
/// # async fn get_item(_: Request) -> Response { Response::text("") }
/// # async fn create_order(_: Request) -> Response { Response::text("") }
/// Router::new()
///     .wrap(ExchangeLogger::new())
///     .get("/items/{id}", get_item)
///     .post("/orders", create_order);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    fallback: BoxedHandler,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            middlewares: Vec::new(),
            fallback: not_found.into_boxed_handler(),
        }
    }

    /// Appends a middleware to the stack. Middlewares run in the order
    /// they were added, wrapping everything registered on this router.
    pub fn wrap(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler)
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::DELETE, path, handler)
    }

    fn add(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Runs one complete exchange: middleware stack, route lookup, handler.
    ///
    /// The request head arrives as [`http`] parts and the body already
    /// buffered — this is the seam the server drives per request, and the
    /// one integration tests call directly without opening a socket.
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();

        let (handler, params) = match self.lookup(&parts.method, parts.uri.path()) {
            Some(found) => found,
            None => (Arc::clone(&self.fallback), HashMap::new()),
        };

        let chain: Arc<[Arc<dyn Middleware>]> = Arc::from(self.middlewares.as_slice());
        Next::new(chain, handler)
            .run(Request::new(parts, body, params))
            .await
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// Terminal handler for unmatched routes. Lives inside the chain so
/// middleware sees the exchange before the 404 leaves the building.
async fn not_found(_req: Request) -> Response {
    Response::status(StatusCode::NOT_FOUND)
}
