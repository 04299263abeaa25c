//! Shared fixtures for unit tests.

use chrono::{DateTime, FixedOffset};

use crate::clock::Clock;
use crate::request::Request;

/// A clock pinned to one instant, for byte-stable bodies and log lines.
pub(crate) struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    pub(crate) fn at(rfc3339: &str) -> Self {
        Self(DateTime::parse_from_rfc3339(rfc3339).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// A request as the server boundary would build it, from a fixed peer.
pub(crate) fn request(method: &str, path: &str, headers: &[(&str, &str)]) -> Request {
    Request::new(
        method.to_owned(),
        path.to_owned(),
        headers.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
        "127.0.0.1:4242".parse().unwrap(),
    )
}
