//! Wall-clock time as an injected capability.
//!
//! Handlers and middleware never call `Local::now()` directly — they hold a
//! [`Clock`] and ask it. Production wires in [`SystemClock`]; tests wire in a
//! fixed instant and get byte-stable response bodies and log timestamps.

use chrono::{DateTime, FixedOffset, Local};

/// Produces the current instant. Infallible, at least second resolution.
pub trait Clock: Send + Sync + 'static {
    /// The current wall-clock time in the server's local zone, carrying its
    /// UTC offset so RFC 3339 rendering and calendar fields agree.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The real wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}
