//! Request logging middleware.
//!
//! One JSON object per request, one line per object, emitted *before* the
//! wrapped handler runs. The sink is an injected capability, not ambient
//! global state — production wires in [`StdoutSink`], tests wire in a buffer
//! and assert on the captured lines.

use std::sync::Arc;

use chrono::SecondsFormat;
use serde::Serialize;
use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::middleware::Middleware;
use crate::request::Request;

/// One request's log record. Serialized immediately; never stored.
#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    /// RFC 3339, server-local zone.
    timestamp: String,
    /// Peer socket address as reported by the transport, `ip:port`.
    ip: String,
    method: &'a str,
    path: &'a str,
}

/// Where log lines go. Implementations must be line-atomic under concurrent
/// writers: one call, one uncorrupted line.
pub trait LogSink: Send + Sync + 'static {
    fn write_line(&self, line: &str);
}

/// The production sink. `println!` holds the stdout lock for the duration of
/// one line, which is exactly the atomicity the sink contract asks for.
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }
}

/// Wraps a handler so every request is logged before it is handled.
///
/// Logging is fire-and-forget: a record that fails to serialize is reported
/// through `tracing` and dropped. The client never sees a logging failure,
/// and the request proceeds unmodified either way.
pub struct LoggingMiddleware {
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
}

impl LoggingMiddleware {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink, clock: Arc::new(SystemClock) }
    }

    /// Pins the timestamp source, for deterministic log lines in tests.
    pub fn with_clock(sink: Arc<dyn LogSink>, clock: Arc<dyn Clock>) -> Self {
        Self { sink, clock }
    }
}

impl Middleware for LoggingMiddleware {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(LoggingHandler {
            next,
            sink: Arc::clone(&self.sink),
            clock: Arc::clone(&self.clock),
        })
    }
}

struct LoggingHandler {
    next: BoxedHandler,
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
}

impl ErasedHandler for LoggingHandler {
    fn call(&self, req: Request) -> BoxFuture {
        let entry = LogEntry {
            timestamp: self.clock.now().to_rfc3339_opts(SecondsFormat::Secs, true),
            ip: req.remote_addr().to_string(),
            method: req.method(),
            path: req.path(),
        };
        match serde_json::to_string(&entry) {
            Ok(line) => self.sink.write_line(&line),
            Err(e) => warn!("dropping unserializable log entry: {e}"),
        }

        self.next.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::handler::Handler;
    use crate::response::Response;
    use crate::testutil::{request, FixedClock};

    /// Captures lines in memory for assertion.
    #[derive(Default)]
    struct CaptureSink {
        lines: Mutex<Vec<String>>,
    }

    impl LogSink for CaptureSink {
        fn write_line(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_owned());
        }
    }

    fn echo_handler() -> BoxedHandler {
        (|req: Request| async move { Response::text(format!("{} {}", req.method(), req.path())) })
            .into_boxed_handler()
    }

    #[tokio::test]
    async fn emits_one_json_line_with_the_request_facts() {
        let sink = Arc::new(CaptureSink::default());
        let clock = Arc::new(FixedClock::at("2024-03-15T10:30:00Z"));
        let sink_capability: Arc<dyn LogSink> = sink.clone();
        let chain = LoggingMiddleware::with_clock(sink_capability, clock).wrap(echo_handler());

        chain.call(request("GET", "/", &[])).await;

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["timestamp"], "2024-03-15T10:30:00Z");
        assert_eq!(parsed["ip"], "127.0.0.1:4242");
        assert_eq!(parsed["method"], "GET");
        assert_eq!(parsed["path"], "/");
    }

    #[tokio::test]
    async fn logs_before_the_handler_runs_and_leaves_the_request_alone() {
        let sink = Arc::new(CaptureSink::default());

        // The handler itself checks that its log line already exists.
        let observed = {
            let sink = Arc::clone(&sink);
            let handle = move |req: Request| {
                let sink = Arc::clone(&sink);
                async move {
                    assert_eq!(sink.lines.lock().unwrap().len(), 1);
                    assert_eq!(req.method(), "POST");
                    assert_eq!(req.path(), "/somewhere");
                    assert_eq!(req.header("x-probe"), Some("kept"));
                    Response::text("seen")
                }
            };
            handle.into_boxed_handler()
        };

        let sink_capability: Arc<dyn LogSink> = sink.clone();
        let chain = LoggingMiddleware::new(sink_capability).wrap(observed);
        let resp = chain
            .call(request("POST", "/somewhere", &[("x-probe", "kept")]))
            .await;

        assert_eq!(resp.body(), b"seen");
        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["method"], "POST");
        assert_eq!(parsed["path"], "/somewhere");
    }

    #[tokio::test]
    async fn wrapped_response_passes_through_unchanged() {
        let sink = Arc::new(CaptureSink::default());
        let chain = LoggingMiddleware::new(sink).wrap(echo_handler());

        let resp = chain.call(request("GET", "/time", &[])).await;
        assert_eq!(resp.body(), b"GET /time");
    }
}
