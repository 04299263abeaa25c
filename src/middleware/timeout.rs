//! Per-request timeout middleware.
//!
//! # The race
//!
//! The wrapped handler runs on its own tokio task while this layer waits on
//! whichever happens first: the task finishing, or the deadline expiring.
//! First signal wins and is terminal — `{Running} → {Completed} | {TimedOut}`,
//! no retries, no second firing.
//!
//! On expiry the client gets `504 Gateway Timeout` and the deadline's
//! cancellation token is triggered. Cancellation is *cooperative*: the
//! in-flight handler is not torn down. It may keep running detached, but the
//! response value it eventually produces is dropped — the `select!` below is
//! the single point that decides which response reaches the transport, so a
//! late finisher cannot race a second write onto the wire.

use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

/// A cancellation signal plus a fixed expiry instant, threaded through one
/// request so any stage can observe "time is up" cooperatively.
#[derive(Clone)]
pub struct Deadline {
    token: CancellationToken,
    expires_at: Instant,
}

impl Deadline {
    fn after(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            expires_at: Instant::now() + timeout,
        }
    }

    /// The instant past which the timeout layer stops waiting.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Resolves once the deadline has fired. Handlers doing slow work can
    /// `select!` on this to bail out instead of computing a response nobody
    /// will read.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn cancel(&self) {
        self.token.cancel();
    }
}

/// Wraps a handler with a maximum execution duration.
pub struct TimeoutMiddleware {
    timeout: Duration,
}

impl TimeoutMiddleware {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Middleware for TimeoutMiddleware {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(TimeoutHandler { next, timeout: self.timeout })
    }
}

struct TimeoutHandler {
    next: BoxedHandler,
    timeout: Duration,
}

impl ErasedHandler for TimeoutHandler {
    fn call(&self, req: Request) -> BoxFuture {
        let next = Arc::clone(&self.next);
        let timeout = self.timeout;

        Box::pin(async move {
            let deadline = Deadline::after(timeout);
            let mut req = req;
            req.deadline = Some(deadline.clone());

            let method = req.method.clone();
            let path = req.path.clone();

            // Independent task: the handler must not block this select.
            let in_flight = tokio::spawn(async move { next.call(req).await });

            tokio::select! {
                finished = in_flight => match finished {
                    Ok(response) => response,
                    // The handler panicked; its task is gone.
                    Err(join_err) => {
                        debug!(%method, %path, "handler task failed: {join_err}");
                        Response::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                    }
                },
                () = tokio::time::sleep_until(deadline.expires_at()) => {
                    // Signal the detached handler, answer the client, move on.
                    // Dropping the JoinHandle leaves the task running; its
                    // response value is discarded when it completes.
                    deadline.cancel();
                    debug!(%method, %path, timeout_ms = timeout.as_millis() as u64, "request timed out");
                    Response::error(StatusCode::GATEWAY_TIMEOUT, "Request timed out")
                }
            }
            // Both arms drop the sleep timer here; nothing fires twice.
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::handler::Handler;
    use crate::testutil::request;

    fn sleeping_handler(sleep: Duration) -> BoxedHandler {
        (move |_req: Request| async move {
            tokio::time::sleep(sleep).await;
            Response::text("slow but done")
        })
        .into_boxed_handler()
    }

    #[tokio::test(start_paused = true)]
    async fn slow_handler_is_cut_off_with_504() {
        let chain = TimeoutMiddleware::new(Duration::from_millis(1000))
            .wrap(sleeping_handler(Duration::from_millis(2000)));

        let resp = chain.call(request("GET", "/", &[])).await;
        assert_eq!(resp.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(resp.body(), b"Request timed out\n");
    }

    #[tokio::test(start_paused = true)]
    async fn fast_handler_response_stands_untouched() {
        let chain = TimeoutMiddleware::new(Duration::from_millis(1000))
            .wrap(sleeping_handler(Duration::from_millis(10)));

        let resp = chain.call(request("GET", "/", &[])).await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.body(), b"slow but done");
    }

    #[tokio::test(start_paused = true)]
    async fn handler_sees_the_attached_deadline() {
        let saw_deadline = Arc::new(AtomicBool::new(false));
        let handler = {
            let saw_deadline = Arc::clone(&saw_deadline);
            let handle = move |req: Request| {
                let saw_deadline = Arc::clone(&saw_deadline);
                async move {
                    saw_deadline.store(req.deadline().is_some(), Ordering::SeqCst);
                    Response::text("ok")
                }
            };
            handle.into_boxed_handler()
        };

        let chain = TimeoutMiddleware::new(Duration::from_millis(1000)).wrap(handler);
        chain.call(request("GET", "/", &[])).await;
        assert!(saw_deadline.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_cancels_the_deadline_cooperatively() {
        let observed_cancel = Arc::new(AtomicBool::new(false));
        let handler = {
            let observed_cancel = Arc::clone(&observed_cancel);
            let handle = move |req: Request| {
                let observed_cancel = Arc::clone(&observed_cancel);
                async move {
                    if let Some(deadline) = req.deadline() {
                        deadline.cancelled().await;
                        observed_cancel.store(true, Ordering::SeqCst);
                    }
                    Response::text("never read")
                }
            };
            handle.into_boxed_handler()
        };

        let chain = TimeoutMiddleware::new(Duration::from_millis(100)).wrap(handler);
        let resp = chain.call(request("GET", "/", &[])).await;
        assert_eq!(resp.status_code(), StatusCode::GATEWAY_TIMEOUT);

        // Let the detached task observe the cancellation signal.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(observed_cancel.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_handler_maps_to_500() {
        let handler = (|req: Request| async move {
            if req.path() == "/" {
                panic!("boom");
            }
            Response::text("reachable only off the root path")
        })
        .into_boxed_handler();

        let chain = TimeoutMiddleware::new(Duration::from_millis(1000)).wrap(handler);
        let resp = chain.call(request("GET", "/", &[])).await;
        assert_eq!(resp.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
