//! The horo binary: current-time-over-HTTP on port 8080.
//!
//! Run with:
//!   RUST_LOG=info cargo run
//!
//! Try:
//!   curl http://localhost:8080/
//!   curl -H 'accept: application/json' http://localhost:8080/
//!   curl -X POST http://localhost:8080/        # 405
//!
//! Request log lines (one JSON object each) go to stdout; server diagnostics
//! go through `tracing`.

use std::sync::Arc;
use std::time::Duration;

use horo::middleware::{self, LoggingMiddleware, StdoutSink, TimeoutMiddleware};
use horo::{Server, TimeService};

/// Requests slower than this answer 504.
const REQUEST_TIMEOUT: Duration = Duration::from_millis(1000);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Timeout outermost, then logging, then the handler itself: a request
    // gets its deadline first, is logged next, and is answered last.
    let handler = middleware::compose(
        vec![
            Box::new(TimeoutMiddleware::new(REQUEST_TIMEOUT)),
            Box::new(LoggingMiddleware::new(Arc::new(StdoutSink))),
        ],
        TimeService::new().into_handler(),
    );

    Server::bind("0.0.0.0:8080")
        .serve(handler)
        .await
        .expect("server error");
}
