//! Request/response body logging.
//!
//! [`ExchangeLogger`] records four structured entries per exchange and is
//! otherwise invisible: the handler reads the same buffered body bytes the
//! logger read, and the client receives the response value the handler
//! produced, untouched.
//!
//! Entry order is fixed within one exchange:
//!
//! 1. request line — scheme, host, path, query string
//! 2. request method
//! 3. request body text
//! 4. *(downstream runs)*
//! 5. response — status code and body text
//!
//! Entries 1–3 are always emitted before the downstream chain runs; entry
//! 5 only after it returns. A downstream panic unwinds past entry 5 and is
//! handled by the connection task, not here.
//!
//! The destination of the entries is a [`Sink`] the logger receives at
//! construction. [`ExchangeLogger::new`] wires in [`TracingSink`], which
//! emits `tracing` events; tests pass a capturing sink instead.

use std::sync::Arc;

use http::{Method, StatusCode};
use tracing::info;

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;

// ── Sink ─────────────────────────────────────────────────────────────────────

/// Destination for the four log entries of one exchange.
///
/// Each method corresponds to one entry; the sink owns formatting and
/// persistence. The logger never batches, retries, or buffers across
/// exchanges — one call per entry, in order, and that is all.
pub trait Sink: Send + Sync + 'static {
    /// Entry 1: scheme, host, path, and query string of the request line.
    /// `query` includes the leading `?`, or is empty when absent.
    fn request_line(&self, scheme: &str, host: &str, path: &str, query: &str);

    /// Entry 2: the HTTP method.
    fn request_method(&self, method: &Method);

    /// Entry 3: the decoded request body.
    fn request_body(&self, body: &str);

    /// Entry 4: the response status and decoded body, emitted after the
    /// downstream chain returned.
    fn response(&self, status: StatusCode, body: &str);
}

/// The production [`Sink`]: one `tracing` event per entry, with named
/// fields so downstream subscribers can filter and index them.
pub struct TracingSink;

impl Sink for TracingSink {
    fn request_line(&self, scheme: &str, host: &str, path: &str, query: &str) {
        info!(scheme, host, path, query, "request");
    }

    fn request_method(&self, method: &Method) {
        info!(method = %method, "request method");
    }

    fn request_body(&self, body: &str) {
        info!(body, "request body");
    }

    fn response(&self, status: StatusCode, body: &str) {
        info!(status = status.as_u16(), body, "response");
    }
}

// ── ExchangeLogger ────────────────────────────────────────────────────────────

/// Middleware that logs metadata and full bodies of every exchange.
///
/// Install it first so it observes what every later middleware and the
/// handler see:
///
/// ```rust,no_run
/// use tapline::{ExchangeLogger, Response, Router};
///
/// let app = Router::new()
///     .wrap(ExchangeLogger::new())
///     .get("/items", |_req: tapline::Request| async {
///         Response::json(br#"[]"#.to_vec())
///     });
/// ```
///
/// Bodies are decoded as UTF-8 for logging; invalid sequences become
/// U+FFFD replacement characters in the log entry only — the bytes the
/// handler and the client see are never altered.
pub struct ExchangeLogger {
    sink: Arc<dyn Sink>,
}

impl ExchangeLogger {
    /// Logger writing to [`TracingSink`].
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }

    /// Logger writing to a custom sink. This is the seam test suites use
    /// to capture entries instead of emitting them.
    pub fn with_sink(sink: impl Sink) -> Self {
        Self { sink: Arc::new(sink) }
    }
}

impl Default for ExchangeLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for ExchangeLogger {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let sink = Arc::clone(&self.sink);
        Box::pin(async move {
            let query = match req.query() {
                Some(q) => format!("?{q}"),
                None => String::new(),
            };
            sink.request_line(req.scheme(), req.host(), req.path(), &query);
            sink.request_method(req.method());
            sink.request_body(&String::from_utf8_lossy(req.body()));

            let res = next.run(req).await;

            sink.response(res.status_code(), &String::from_utf8_lossy(res.body()));
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use bytes::Bytes;

    use super::*;
    use crate::handler::Handler;
    use crate::response::Response;

    /// Records every entry; entry order in the vec is emission order.
    #[derive(Default)]
    struct Capture {
        entries: Mutex<Vec<Entry>>,
    }

    #[derive(Debug, PartialEq)]
    enum Entry {
        Line { scheme: String, host: String, path: String, query: String },
        Method(String),
        RequestBody(String),
        Response { status: u16, body: String },
    }

    impl Sink for Arc<Capture> {
        fn request_line(&self, scheme: &str, host: &str, path: &str, query: &str) {
            self.entries.lock().unwrap().push(Entry::Line {
                scheme: scheme.to_owned(),
                host: host.to_owned(),
                path: path.to_owned(),
                query: query.to_owned(),
            });
        }

        fn request_method(&self, method: &Method) {
            self.entries.lock().unwrap().push(Entry::Method(method.to_string()));
        }

        fn request_body(&self, body: &str) {
            self.entries.lock().unwrap().push(Entry::RequestBody(body.to_owned()));
        }

        fn response(&self, status: StatusCode, body: &str) {
            self.entries.lock().unwrap().push(Entry::Response {
                status: status.as_u16(),
                body: body.to_owned(),
            });
        }
    }

    fn request(method: &str, uri: &str, body: &[u8]) -> Request {
        let (parts, ()) = http::Request::builder()
            .method(method)
            .uri(uri)
            .header("host", "localhost:3000")
            .body(())
            .unwrap()
            .into_parts();
        Request::new(parts, Bytes::copy_from_slice(body), HashMap::new())
    }

    async fn run(
        logger: ExchangeLogger,
        req: Request,
        handler: impl Handler,
    ) -> Response {
        let chain: Arc<[Arc<dyn Middleware>]> =
            Arc::from(vec![Arc::new(logger) as Arc<dyn Middleware>]);
        Next::new(chain, handler.into_boxed_handler()).run(req).await
    }

    #[tokio::test]
    async fn get_with_query_logs_four_entries_in_order() {
        let capture = Arc::new(Capture::default());
        let logger = ExchangeLogger::with_sink(Arc::clone(&capture));

        let res = run(logger, request("GET", "/items?id=5", b""), |_req: Request| async {
            Response::json(br#"{"ok":true}"#.to_vec())
        })
        .await;

        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), br#"{"ok":true}"#);

        let entries = capture.entries.lock().unwrap();
        assert_eq!(
            *entries,
            vec![
                Entry::Line {
                    scheme: "http".to_owned(),
                    host: "localhost:3000".to_owned(),
                    path: "/items".to_owned(),
                    query: "?id=5".to_owned(),
                },
                Entry::Method("GET".to_owned()),
                Entry::RequestBody(String::new()),
                Entry::Response { status: 200, body: r#"{"ok":true}"#.to_owned() },
            ]
        );
    }

    #[tokio::test]
    async fn handler_reads_the_body_the_logger_logged() {
        let capture = Arc::new(Capture::default());
        let logger = ExchangeLogger::with_sink(Arc::clone(&capture));

        let res = run(
            logger,
            request("POST", "/orders", br#"{"qty":3}"#),
            |req: Request| async move {
                // The logger consumed nothing: same bytes, same content.
                assert_eq!(req.body(), br#"{"qty":3}"#);
                Response::status(StatusCode::CREATED)
            },
        )
        .await;

        assert_eq!(res.status_code(), StatusCode::CREATED);
        let entries = capture.entries.lock().unwrap();
        assert_eq!(entries[2], Entry::RequestBody(r#"{"qty":3}"#.to_owned()));
    }

    #[tokio::test]
    async fn response_entry_comes_after_the_handler_ran() {
        let capture = Arc::new(Capture::default());
        let logger = ExchangeLogger::with_sink(Arc::clone(&capture));
        let seen_at_handler_time = Arc::new(Mutex::new(0usize));

        let seen = Arc::clone(&seen_at_handler_time);
        let probe = Arc::clone(&capture);
        run(logger, request("GET", "/", b""), move |_req: Request| {
            let seen = Arc::clone(&seen);
            let probe = Arc::clone(&probe);
            async move {
                *seen.lock().unwrap() = probe.entries.lock().unwrap().len();
                Response::text("ok")
            }
        })
        .await;

        // All three request entries were already emitted when the handler
        // ran; the response entry arrived afterwards.
        assert_eq!(*seen_at_handler_time.lock().unwrap(), 3);
        assert_eq!(capture.entries.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn error_status_is_logged_like_success() {
        let capture = Arc::new(Capture::default());
        let logger = ExchangeLogger::with_sink(Arc::clone(&capture));

        run(logger, request("GET", "/missing", b""), |_req: Request| async {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .text("boom")
        })
        .await;

        let entries = capture.entries.lock().unwrap();
        assert_eq!(
            entries[3],
            Entry::Response { status: 500, body: "boom".to_owned() }
        );
    }

    #[tokio::test]
    async fn non_utf8_body_is_logged_lossily_but_passed_through_intact() {
        let capture = Arc::new(Capture::default());
        let logger = ExchangeLogger::with_sink(Arc::clone(&capture));
        let raw = [0x66, 0x6f, 0xff, 0x6f]; // "fo<invalid>o"

        let res = run(logger, request("POST", "/blob", &raw), |req: Request| async move {
            // Handler sees the original bytes, replacement happened only
            // in the log entry.
            Response::json(req.body().to_vec())
        })
        .await;

        assert_eq!(res.body(), &raw);
        let entries = capture.entries.lock().unwrap();
        assert_eq!(entries[2], Entry::RequestBody("fo\u{fffd}o".to_owned()));
    }
}
