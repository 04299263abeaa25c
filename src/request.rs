//! Incoming HTTP request type.

use std::net::SocketAddr;

use crate::middleware::timeout::Deadline;

/// An incoming HTTP request, as seen by handlers and middleware.
///
/// Built once per request at the server boundary and owned by that request's
/// task — no sharing, no locks. Middleware pass it down the chain unchanged,
/// except that [`TimeoutMiddleware`](crate::middleware::TimeoutMiddleware)
/// attaches a [`Deadline`] so downstream stages can observe "time is up"
/// cooperatively.
pub struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) remote_addr: SocketAddr,
    pub(crate) deadline: Option<Deadline>,
}

impl Request {
    pub(crate) fn new(
        method: String,
        path: String,
        headers: Vec<(String, String)>,
        remote_addr: SocketAddr,
    ) -> Self {
        Self { method, path, headers, remote_addr, deadline: None }
    }

    /// The request method, uppercase as it appeared on the wire (e.g. `"GET"`).
    pub fn method(&self) -> &str { &self.method }

    /// The request path, e.g. `"/"`.
    pub fn path(&self) -> &str { &self.path }

    /// The peer's socket address, as reported by the transport.
    pub fn remote_addr(&self) -> SocketAddr { self.remote_addr }

    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The deadline attached by a timeout layer, if the request passed through
    /// one. Long-running handlers can `select!` on
    /// [`Deadline::cancelled`](Deadline::cancelled) to bail out early.
    pub fn deadline(&self) -> Option<&Deadline> {
        self.deadline.as_ref()
    }
}
