//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers and middleware build a [`Response`] value and return it. Exactly
//! one response per request ever reaches the transport — when the timeout
//! layer short-circuits, the losing handler's response value is simply
//! dropped, never written.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK)
///
/// ```rust
/// use horo::Response;
///
/// Response::json(br#"{"hour":10}"#.to_vec());
/// Response::text("2024-03-15T10:30:00Z\n");
/// ```
///
/// # Error responses
///
/// ```rust
/// use horo::Response;
/// use http::StatusCode;
///
/// Response::error(StatusCode::METHOD_NOT_ALLOWED, "Invalid request method");
/// ```
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
}

impl Response {
    /// `200 OK` — `application/json`.
    ///
    /// Pass bytes from your serialiser directly — `serde_json::to_vec(&val)`
    /// or hand-built `format!(…).into_bytes()`; horo does not touch them.
    pub fn json(body: Vec<u8>) -> Self {
        Self::with_body(StatusCode::OK, "application/json", body)
    }

    /// `200 OK` — `text/plain`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_body(StatusCode::OK, "text/plain", body.into().into_bytes())
    }

    /// Response with no body and the given status.
    pub fn status(status: StatusCode) -> Self {
        Self { status, headers: Vec::new(), body: Vec::new() }
    }

    /// Plain-text error response. A newline is appended to `message`, matching
    /// the one-line-per-error convention of the text bodies this service emits.
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::with_body(status, "text/plain", format!("{message}\n").into_bytes())
    }

    /// A body with an explicit status and content type.
    pub fn with_body(status: StatusCode, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_owned(), content_type.to_owned())],
            body,
        }
    }

    pub fn status_code(&self) -> StatusCode { self.status }

    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Converts into the hyper representation at the server boundary.
    ///
    /// Falls back to a bare 500 if the accumulated headers cannot form a
    /// valid `http::Response` — the best-effort arm of the transport-failure
    /// contract; by this point nothing better can be said to the client.
    pub(crate) fn into_hyper(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        builder.body(Full::new(Bytes::from(self.body))).unwrap_or_else(|_| {
            let mut fallback =
                http::Response::new(Full::new(Bytes::from_static(b"Internal Server Error\n")));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Lets plain `async fn` handlers return `Response`, a string body, or a bare
/// status code — the [`Handler`](crate::Handler) blanket impl converts at the
/// call site.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}
