//! The base time handler.
//!
//! This is the innermost layer of the chain — the only one that knows what
//! the service actually *does*. It validates the method, reads the clock,
//! renders the body, and returns. It never learns about logging or deadlines;
//! those are the wrappers' business.

use std::sync::Arc;

use http::StatusCode;

use crate::clock::{Clock, SystemClock};
use crate::format;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// Answers `GET` with the current time; everything else with 405.
pub struct TimeService {
    clock: Arc<dyn Clock>,
}

impl TimeService {
    /// A service on the real wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// A service on an injected clock. Tests pin the clock to a fixed instant
    /// and assert exact response bodies.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Erases the service into the uniform handler contract, ready to be
    /// wrapped by middleware or served directly.
    pub fn into_handler(self) -> BoxedHandler {
        let clock = self.clock;
        let handle = move |req: Request| {
            let clock = Arc::clone(&clock);
            async move { tell_time(&*clock, &req) }
        };
        handle.into_boxed_handler()
    }
}

impl Default for TimeService {
    fn default() -> Self { Self::new() }
}

fn tell_time(clock: &dyn Clock, req: &Request) -> Response {
    if req.method() != "GET" {
        return Response::error(StatusCode::METHOD_NOT_ALLOWED, "Invalid request method");
    }

    let (content_type, body) = format::render(clock.now(), req.header("accept"));
    Response::with_body(StatusCode::OK, content_type, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{request, FixedClock};

    fn handler_at(rfc3339: &str) -> BoxedHandler {
        TimeService::with_clock(Arc::new(FixedClock::at(rfc3339))).into_handler()
    }

    #[tokio::test]
    async fn get_returns_rfc3339_text_by_default() {
        let handler = handler_at("2024-03-15T10:30:00Z");
        let resp = handler.call(request("GET", "/", &[])).await;

        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.header("content-type"), Some("text/plain"));
        assert_eq!(resp.body(), b"2024-03-15T10:30:00Z\n");
    }

    #[tokio::test]
    async fn get_with_json_accept_returns_snapshot() {
        let handler = handler_at("2024-03-15T10:30:00Z");
        let resp = handler
            .call(request("GET", "/", &[("accept", "application/json")]))
            .await;

        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.header("content-type"), Some("application/json"));

        let parsed: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        let obj = parsed.as_object().unwrap();
        assert_eq!(obj.len(), 7);
        assert_eq!(obj["day_of_week"], "Friday");
        assert_eq!(obj["day_of_month"], 15);
        assert_eq!(obj["month"], "March");
        assert_eq!(obj["year"], 2024);
        assert_eq!(obj["hour"], 10);
        assert_eq!(obj["minute"], 30);
        assert_eq!(obj["second"], 0);
    }

    #[tokio::test]
    async fn non_get_methods_are_rejected() {
        let handler = handler_at("2024-03-15T10:30:00Z");
        for method in ["POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"] {
            let resp = handler
                .call(request(method, "/", &[("accept", "application/json")]))
                .await;
            assert_eq!(resp.status_code(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_eq!(resp.body(), b"Invalid request method\n");
        }
    }

    #[tokio::test]
    async fn repeated_requests_within_one_second_are_byte_identical() {
        let handler = handler_at("2024-03-15T10:30:00Z");
        let first = handler.call(request("GET", "/", &[])).await;
        let second = handler.call(request("GET", "/", &[])).await;
        assert_eq!(first.body(), second.body());
    }
}
