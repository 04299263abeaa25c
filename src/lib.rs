//! # horo
//!
//! A minimal HTTP service that tells the time. Nothing more. Nothing less.
//!
//! ## The shape of it
//!
//! One handler answers `GET /` with the current server time — RFC 3339 plain
//! text by default, a structured JSON object when the client sends
//! `Accept: application/json`. Everything interesting lives in the layers
//! *around* that handler:
//!
//! - **[`middleware::LoggingMiddleware`]** — one JSON log line per request,
//!   emitted to an injected sink before the handler runs
//! - **[`middleware::TimeoutMiddleware`]** — races the handler against a
//!   deadline and answers `504 Gateway Timeout` if the deadline wins
//!
//! Each middleware wraps a handler and hands back another handler with the
//! same contract. The base handler never learns it was wrapped. Compose them
//! in any order at startup with [`middleware::compose`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use horo::middleware::{self, LoggingMiddleware, StdoutSink, TimeoutMiddleware};
//! use horo::{Server, TimeService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let handler = middleware::compose(
//!         vec![
//!             Box::new(TimeoutMiddleware::new(Duration::from_millis(1000))),
//!             Box::new(LoggingMiddleware::new(Arc::new(StdoutSink))),
//!         ],
//!         TimeService::new().into_handler(),
//!     );
//!
//!     Server::bind("0.0.0.0:8080").serve(handler).await.unwrap();
//! }
//! ```
//!
//! ```text
//! $ curl http://localhost:8080/
//! 2024-03-15T10:30:00Z
//! $ curl -H 'accept: application/json' http://localhost:8080/
//! {"day_of_week":"Friday","day_of_month":15,"month":"March","year":2024,"hour":10,"minute":30,"second":0}
//! ```

mod clock;
mod error;
mod format;
mod handler;
mod request;
mod response;
mod server;
mod service;

pub mod middleware;

#[cfg(test)]
mod testutil;

pub use clock::{Clock, SystemClock};
pub use error::Error;
pub use format::TimeSnapshot;
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use server::Server;
pub use service::TimeService;
