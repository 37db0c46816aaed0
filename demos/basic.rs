//! Minimal tapline example — every exchange is logged, bodies included.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl 'http://localhost:3000/items?id=5'
//!   curl -X POST http://localhost:3000/orders \
//!        -H 'content-type: application/json' \
//!        -d '{"qty":3}'
//!   curl http://localhost:3000/nowhere            # 404s are logged too
//!
//! Watch the four entries per exchange arrive on stdout: request line,
//! method, request body, then the response status and body.

use http::StatusCode;
use tapline::{ExchangeLogger, Request, Response, Router, Server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .wrap(ExchangeLogger::new())
        .get("/items", list_items)
        .post("/orders", create_order);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// GET /items?id=5
async fn list_items(req: Request) -> Response {
    let id = req
        .query()
        .and_then(|q| q.strip_prefix("id="))
        .unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","ok":true}}"#).into_bytes())
}

// POST /orders
//
// req.body() is &[u8] — parse with serde_json::from_slice, simd-json, etc.
// tapline logged the same bytes before this handler ever ran.
async fn create_order(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/orders/99")
        .json(br#"{"id":"99"}"#.to_vec())
}
