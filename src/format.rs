//! Rendering an instant as a response body.
//!
//! Two renderings, chosen by the request's `Accept` header:
//!
//! - the default: one RFC 3339 line, `text/plain`
//! - `Accept: application/json`, compared as an **exact string** — no q-value
//!   parsing, no wildcards, deliberately: a [`TimeSnapshot`] JSON object
//!
//! Both are total over all valid instants; there is no error path here.

use chrono::{DateTime, Datelike, FixedOffset, SecondsFormat, Timelike};
use serde::{Deserialize, Serialize};

/// Content type of the JSON rendering, and the exact `Accept` value that
/// selects it.
pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Content type of the plain-text rendering.
pub(crate) const TEXT_PLAIN: &str = "text/plain";

/// Calendar fields of one instant, in the server's local zone.
///
/// Recomputed per request from the clock; never stored. Wire shape:
///
/// ```json
/// {"day_of_week":"Friday","day_of_month":15,"month":"March",
///  "year":2024,"hour":10,"minute":30,"second":0}
/// ```
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSnapshot {
    pub day_of_week: String,
    pub day_of_month: u32,
    pub month: String,
    pub year: i32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl TimeSnapshot {
    /// Full English weekday and month names, per `%A` / `%B`.
    pub fn of(t: DateTime<FixedOffset>) -> Self {
        Self {
            day_of_week: t.format("%A").to_string(),
            day_of_month: t.day(),
            month: t.format("%B").to_string(),
            year: t.year(),
            hour: t.hour(),
            minute: t.minute(),
            second: t.second(),
        }
    }
}

/// Renders `now` per the negotiated content type: `(content_type, body)`.
///
/// The text body is one RFC 3339 line with a trailing newline, seconds
/// precision, `Z` for a zero UTC offset. The JSON body has no trailing
/// newline.
pub(crate) fn render(now: DateTime<FixedOffset>, accept: Option<&str>) -> (&'static str, Vec<u8>) {
    if accept == Some(APPLICATION_JSON) {
        let snapshot = TimeSnapshot::of(now);
        // A struct of strings and integers cannot fail to serialize.
        let body = serde_json::to_vec(&snapshot)
            .unwrap_or_else(|_| b"{}".to_vec());
        (APPLICATION_JSON, body)
    } else {
        let mut line = now.to_rfc3339_opts(SecondsFormat::Secs, true);
        line.push('\n');
        (TEXT_PLAIN, line.into_bytes())
    }
}
