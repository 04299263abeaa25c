//! Handler contract and type erasure.
//!
//! # One contract, many layers
//!
//! Every layer of the service — the base time handler and each middleware
//! wrapper around it — satisfies the same contract: *given a request, produce
//! a response*. Middleware can therefore wrap anything, including other
//! middleware, and the composed chain is indistinguishable from a bare
//! handler.
//!
//! Concrete handler types differ (an `async fn`, a logging wrapper, a timeout
//! wrapper), so the chain is held behind a **trait object**:
//!
//! ```text
//! async fn tell_time(req: Request) -> Response { … }   ← user writes this
//!        ↓ tell_time.into_boxed_handler()              ← Handler blanket impl
//! Arc::new(FnHandler(tell_time))                       ← stored as BoxedHandler
//!        ↓ middleware.wrap(next)                       ← wrappers impl ErasedHandler directly
//! handler.call(req)  at request time                   ← one vtable dispatch per layer
//! ```
//!
//! The runtime cost per request is one Arc clone plus one virtual call per
//! layer — negligible compared to network I/O.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Pin<Box<…>>` because the runtime polls the future in-place; `Send +
/// 'static` so tokio may move it across threads (the timeout middleware
/// spawns handler futures onto independent tasks).
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface. Middleware wrappers implement this directly;
/// plain `async fn` handlers reach it through the [`Handler`] blanket impl.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
///
/// `Arc` gives cheap, thread-safe shared ownership — one atomic increment per
/// request, and the timeout middleware can hand a clone to a spawned task.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid base handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it, which keeps the API surface stable.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

/// Because `Sealed` is private, external crates cannot name it and therefore
/// cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

/// Implement `Handler` for any function with the right signature — named
/// `async fn` items, closures returning futures, anything that implements `Fn`.
impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype that holds a concrete handler `F` and implements [`ErasedHandler`],
/// bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
