//! HTTP cache control module
//!
//! Provides `Last-Modified` formatting and conditional request handling.

use chrono::{DateTime, Utc};
use hyper::header::{CACHE_CONTROL, IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::HeaderMap;
use std::time::SystemTime;

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Parse an HTTP date into seconds since the Unix epoch
///
/// Accepts IMF-fixdate as well as the obsolete RFC 850 and asctime forms.
pub fn parse_http_date(value: &str) -> Option<i64> {
    httpdate::parse_http_date(value.trim())
        .ok()
        .map(|time| DateTime::<Utc>::from(time).timestamp())
}

/// Modification time truncated to whole seconds, the resolution of HTTP dates
fn unix_seconds(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp()
}

/// Modification time in milliseconds since the Unix epoch
pub fn unix_millis(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp_millis()
}

/// Check whether the client's cached copy is still valid
///
/// Rules:
/// - No `If-None-Match` and no `If-Modified-Since`: not fresh
/// - `Cache-Control: no-cache` on the request: not fresh
/// - `If-None-Match`: only `*` matches, no entity tags are issued
/// - `If-Modified-Since`: fresh when the file is not newer than the date
///
/// # Returns
/// Returns true if the response should be 304 Not Modified
pub fn is_fresh(headers: &HeaderMap, last_modified: SystemTime) -> bool {
    let if_none_match = headers.get(IF_NONE_MATCH).and_then(|v| v.to_str().ok());
    let if_modified_since = headers
        .get(IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok());

    if if_none_match.is_none() && if_modified_since.is_none() {
        return false;
    }

    let no_cache = headers
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|directive| directive.trim().eq_ignore_ascii_case("no-cache"));
    if no_cache {
        return false;
    }

    if let Some(tags) = if_none_match {
        if !tags.split(',').any(|tag| tag.trim() == "*") {
            return false;
        }
    }

    if let Some(since) = if_modified_since {
        return parse_http_date(since).is_some_and(|since| unix_seconds(last_modified) <= since);
    }

    true
}
