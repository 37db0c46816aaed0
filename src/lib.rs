//! # tapline
//!
//! A tap on the HTTP line: middleware that logs every request and response
//! — metadata and full bodies — while the exchange passes through your
//! handler pipeline untouched.
//!
//! ## The contract
//!
//! The logger is transparent. The client receives exactly the status and
//! bytes the downstream handler produced; the handler reads exactly the
//! body bytes the logger already recorded. Bodies are buffered in full
//! before any middleware runs, so there is no stream to rewind and no
//! Content-Length header to trust.
//!
//! What the reverse proxy in front of you already owns — tapline
//! intentionally ignores:
//!
//! - **Body-size limits** — `client_max_body_size` in nginx
//! - **Rate limiting** — `limit_req` / ingress-nginx annotations
//! - **TLS termination** — nginx SSL / k8s ingress
//!
//! What tapline does:
//!
//! - [`ExchangeLogger`] — four structured log entries per exchange:
//!   request line, method, request body, response status + body
//! - A [`Middleware`] trait with an explicit [`Next`] continuation
//! - Radix-tree routing via [`matchit`], hyper-based serving, graceful
//!   shutdown on SIGTERM / Ctrl-C
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tapline::{ExchangeLogger, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .wrap(ExchangeLogger::new())
//!         .get("/items/{id}", get_item)
//!         .post("/orders", create_order);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_item(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//!
//! async fn create_order(req: Request) -> Response {
//!     if req.body().is_empty() {
//!         return Response::status(http::StatusCode::BAD_REQUEST);
//!     }
//!     Response::json(br#"{"ok":true}"#.to_vec())
//! }
//! ```
//!
//! Every exchange above — including unmatched paths that fall through to
//! the built-in 404 — produces log entries like:
//!
//! ```text
//! INFO request: scheme=http host=localhost:3000 path=/orders query=
//! INFO request method: method=POST
//! INFO request body: body={"qty":3}
//! INFO response: status=200 body={"ok":true}
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;

pub use error::Error;
pub use handler::Handler;
pub use middleware::logger::{ExchangeLogger, Sink, TracingSink};
pub use middleware::{BoxFuture, Middleware, Next};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response};
pub use router::Router;
pub use server::Server;
