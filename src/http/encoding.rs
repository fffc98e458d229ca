//! Content-Encoding negotiation
//!
//! Parses `Accept-Encoding` and decides whether the client takes gzip.

use hyper::header::ACCEPT_ENCODING;
use hyper::HeaderMap;

/// Quality value of a single `Accept-Encoding` entry, `None` if malformed
fn parse_quality(params: &str) -> Option<f32> {
    for param in params.split(';') {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("q") {
            return value.trim().parse::<f32>().ok();
        }
    }
    Some(1.0)
}

/// Check whether the client accepts gzip-encoded responses
///
/// Supports:
/// - Plain token: `gzip, deflate`
/// - Quality values: `gzip;q=0.5`, `gzip;q=0` refuses
/// - Wildcard: `*` covers gzip unless gzip is listed explicitly
/// - Alias: `x-gzip`
///
/// # Examples
/// ```
/// use hyper::HeaderMap;
/// use mountserve::http::encoding::accepts_gzip;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("accept-encoding", "br, gzip;q=0.8".parse().unwrap());
/// assert!(accepts_gzip(&headers));
/// ```
pub fn accepts_gzip(headers: &HeaderMap) -> bool {
    let mut explicit: Option<bool> = None;
    let mut wildcard: Option<bool> = None;

    let entries = headers
        .get_all(ACCEPT_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','));

    for entry in entries {
        let (coding, params) = entry.split_once(';').unwrap_or((entry, ""));
        let coding = coding.trim();
        let Some(quality) = parse_quality(params) else {
            continue;
        };
        let accepted = quality > 0.0;

        if coding.eq_ignore_ascii_case("gzip") || coding.eq_ignore_ascii_case("x-gzip") {
            explicit = Some(explicit.unwrap_or(false) || accepted);
        } else if coding == "*" {
            wildcard = Some(accepted);
        }
    }

    explicit.or(wildcard).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn with_accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_missing_header() {
        assert!(!accepts_gzip(&HeaderMap::new()));
    }

    #[test]
    fn test_plain_tokens() {
        assert!(accepts_gzip(&with_accept("gzip")));
        assert!(accepts_gzip(&with_accept("deflate, gzip, br")));
        assert!(accepts_gzip(&with_accept("x-gzip")));
        assert!(accepts_gzip(&with_accept("GZIP")));
        assert!(!accepts_gzip(&with_accept("br, deflate")));
        assert!(!accepts_gzip(&with_accept("identity")));
    }

    #[test]
    fn test_quality_values() {
        assert!(accepts_gzip(&with_accept("gzip;q=0.1")));
        assert!(accepts_gzip(&with_accept("gzip; q=1.0, br;q=0")));
        assert!(!accepts_gzip(&with_accept("gzip;q=0")));
        assert!(!accepts_gzip(&with_accept("gzip;q=0.000")));
    }

    #[test]
    fn test_wildcard() {
        assert!(accepts_gzip(&with_accept("*")));
        assert!(accepts_gzip(&with_accept("br, *;q=0.5")));
        assert!(!accepts_gzip(&with_accept("*;q=0")));
        assert!(!accepts_gzip(&with_accept("gzip;q=0, *")));
    }

    #[test]
    fn test_malformed_quality_ignored() {
        assert!(!accepts_gzip(&with_accept("gzip;q=abc")));
        assert!(accepts_gzip(&with_accept("gzip;q=abc, *")));
    }
}
