//! Middleware layer.
//!
//! Middleware intercepts requests and is the right place for cross-cutting
//! concerns. Each middleware implements one operation — [`Middleware::wrap`],
//! taking the next handler and returning a wrapped one with the identical
//! contract — so layers nest without the base handler ever knowing.
//!
//! Built-in middleware:
//! - [`LoggingMiddleware`] — one structured JSON log line per request,
//!   emitted to an injected sink before delegating
//! - [`TimeoutMiddleware`] — races the wrapped handler against a deadline,
//!   short-circuiting with `504 Gateway Timeout` on expiry
//!
//! Chains are built once at startup with [`compose`] from an explicit ordered
//! list — first element outermost — rather than by hand-nesting closures:
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use horo::middleware::{self, LoggingMiddleware, StdoutSink, TimeoutMiddleware};
//! use horo::TimeService;
//!
//! let handler = middleware::compose(
//!     vec![
//!         Box::new(TimeoutMiddleware::new(Duration::from_millis(1000))),
//!         Box::new(LoggingMiddleware::new(Arc::new(StdoutSink))),
//!     ],
//!     TimeService::new().into_handler(),
//! );
//! ```

pub mod logging;
pub mod timeout;

pub use logging::{LogSink, LoggingMiddleware, StdoutSink};
pub use timeout::{Deadline, TimeoutMiddleware};

use crate::handler::BoxedHandler;

/// A cross-cutting layer over the handler contract.
///
/// `wrap` must preserve the contract of `next` — request in, response out —
/// adding only the layer's own behavior (a log line, a deadline). It runs
/// once at startup; the returned handler runs on every request.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

/// Folds an ordered list of middleware over a base handler.
///
/// The first element of `middlewares` becomes the outermost layer — the one
/// a request meets first. An empty list returns `base` untouched.
pub fn compose(middlewares: Vec<Box<dyn Middleware>>, base: BoxedHandler) -> BoxedHandler {
    middlewares
        .into_iter()
        .rev()
        .fold(base, |next, middleware| middleware.wrap(next))
}
