//! Incoming HTTP request type.
//!
//! The body is a fully-buffered [`Bytes`] value by the time a `Request`
//! exists: the server drains the transport stream into a growable buffer
//! before middleware or handlers run. This is what makes body logging
//! transparent — the logger and the handler read the *same* owned bytes,
//! so there is no single-pass stream to rewind and no declared
//! Content-Length to trust.

use std::collections::HashMap;

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method};

/// One incoming HTTP request: parsed head, buffered body, matched params.
pub struct Request {
    parts: Parts,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(parts: Parts, body: Bytes, params: HashMap<String, String>) -> Self {
        Self { parts, body, params }
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// URI path, e.g. `/items`.
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Raw query string without the leading `?`, if any.
    pub fn query(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    /// The scheme the client used, as seen by the proxy in front of us.
    ///
    /// tapline never terminates TLS itself, so the request line carries no
    /// scheme. The proxy records it in `x-forwarded-proto`; absent that
    /// header the connection was plain `http`.
    pub fn scheme(&self) -> &str {
        self.header("x-forwarded-proto").unwrap_or("http")
    }

    /// The `Host` header, falling back to the URI authority (HTTP/2 sends
    /// `:authority` instead of a Host header).
    pub fn host(&self) -> &str {
        self.header("host")
            .or_else(|| self.parts.uri.authority().map(|a| a.as_str()))
            .unwrap_or("")
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// The complete request body. Cheap to call repeatedly — the bytes are
    /// already in memory.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Case-insensitive header lookup. Returns `None` for headers whose
    /// value is not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/items/{id}`, `req.param("id")` on `/items/42` returns
    /// `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
