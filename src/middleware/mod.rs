//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured logging, request-id injection,
//! authentication-header inspection.
//!
//! A middleware receives the [`Request`] and an explicit [`Next`]
//! continuation representing the rest of the pipeline — every middleware
//! registered after it plus the matched route handler. The contract is
//! simple: call `next.run(req)` exactly once, eventually, and return the
//! [`Response`] it gives you (modified or not).
//!
//! ```rust
//! use std::time::Instant;
//! use tapline::{BoxFuture, Middleware, Next, Request};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn handle(&self, req: Request, next: Next) -> BoxFuture {
//!         Box::pin(async move {
//!             let started = Instant::now();
//!             let res = next.run(req).await;
//!             tracing::debug!(elapsed = ?started.elapsed(), "handled");
//!             res
//!         })
//!     }
//! }
//! ```
//!
//! Built-in middleware:
//! - [`logger::ExchangeLogger`] — logs metadata and full bodies of every
//!   request/response pair passing through the pipeline

pub mod logger;

use std::sync::Arc;

pub use crate::handler::BoxFuture;
use crate::handler::BoxedHandler;
use crate::request::Request;

/// A pipeline interceptor.
///
/// The returned future owns everything it needs (`BoxFuture` is `'static`),
/// so implementations clone their fields into the `async move` block rather
/// than borrowing `self` across the await.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next) -> BoxFuture;
}

/// The rest of the pipeline, handed to each middleware as an owned value.
///
/// Consuming `self` in [`run`](Next::run) is what enforces the
/// exactly-once contract at the type level: a middleware cannot invoke the
/// downstream chain twice, because the continuation is gone after the
/// first call.
pub struct Next {
    chain: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    handler: BoxedHandler,
}

impl Next {
    pub(crate) fn new(chain: Arc<[Arc<dyn Middleware>]>, handler: BoxedHandler) -> Self {
        Self { chain, index: 0, handler }
    }

    /// Runs the remaining middlewares in registration order, then the
    /// route handler, and resolves to the finished response.
    pub fn run(mut self, req: Request) -> BoxFuture {
        match self.chain.get(self.index) {
            Some(mw) => {
                let mw = Arc::clone(mw);
                self.index += 1;
                mw.handle(req, self)
            }
            None => self.handler.call(req),
        }
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

    fn request(method: &str, uri: &str) -> Request {
        let (parts, ()) = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        Request::new(parts, Bytes::new(), HashMap::new())
    }

    /// Appends a marker before and after the downstream call.
    struct Tag {
        name: &'static str,
        trace: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Tag {
        fn handle(&self, req: Request, next: Next) -> BoxFuture {
            let name = self.name;
            let trace = Arc::clone(&self.trace);
            Box::pin(async move {
                trace.lock().unwrap().push(format!("{name}:before"));
                let res = next.run(req).await;
                trace.lock().unwrap().push(format!("{name}:after"));
                res
            })
        }
    }

    #[tokio::test]
    async fn middlewares_nest_in_registration_order() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let t = Arc::clone(&trace);
        let handler = move |_req: Request| {
            let t = Arc::clone(&t);
            async move {
                t.lock().unwrap().push("handler".to_owned());
                Response::text("done")
            }
        };

        let chain: Arc<[Arc<dyn Middleware>]> = Arc::from(vec![
            Arc::new(Tag { name: "outer", trace: Arc::clone(&trace) }) as Arc<dyn Middleware>,
            Arc::new(Tag { name: "inner", trace: Arc::clone(&trace) }) as Arc<dyn Middleware>,
        ]);

        let next = Next::new(chain, handler.into_boxed_handler());
        let res = next.run(request("GET", "/")).await;

        assert_eq!(res.body(), b"done");
        assert_eq!(
            *trace.lock().unwrap(),
            vec!["outer:before", "inner:before", "handler", "inner:after", "outer:after"]
        );
    }

    #[tokio::test]
    async fn empty_chain_calls_handler_directly() {
        let handler = |_req: Request| async { Response::text("plain") };
        let chain: Arc<[Arc<dyn Middleware>]> = Arc::from(Vec::new());
        let next = Next::new(chain, handler.into_boxed_handler());
        let res = next.run(request("GET", "/")).await;
        assert_eq!(res.body(), b"plain");
    }
}
