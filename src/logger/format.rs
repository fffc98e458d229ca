//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)
//! - Custom patterns with variables

use chrono::Local;
use hyper::header::{CONTENT_ENCODING, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{Request, Response};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;

/// Access log entry for one served request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, HEAD, ...)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version as sent on the request line, e.g. `HTTP/1.1`
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Declared body size; unknown for gzip-streamed responses
    pub content_length: Option<u64>,
    /// Response Content-Encoding, e.g. `gzip`
    pub content_encoding: Option<String>,
    /// Referer header
    pub referer: Option<String>,
    /// User-Agent header
    pub user_agent: Option<String>,
    /// Time until response headers were ready
    pub elapsed: Duration,
}

fn header_string(headers: &hyper::HeaderMap, name: hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

impl AccessLogEntry {
    /// Capture request and response details for the access log
    pub fn new<B, R>(
        peer: SocketAddr,
        req: &Request<B>,
        resp: &Response<R>,
        elapsed: Duration,
    ) -> Self {
        Self {
            remote_addr: peer.ip().to_string(),
            time: Local::now(),
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            http_version: format!("{:?}", req.version()),
            status: resp.status().as_u16(),
            content_length: header_string(resp.headers(), CONTENT_LENGTH)
                .and_then(|v| v.parse().ok()),
            content_encoding: header_string(resp.headers(), CONTENT_ENCODING),
            referer: header_string(req.headers(), REFERER),
            user_agent: header_string(req.headers(), USER_AGENT),
            elapsed,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn bytes_field(&self) -> String {
        self.content_length
            .map_or_else(|| "-".to_string(), |n| n.to_string())
    }

    fn time_local(&self) -> String {
        self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} {}\" {} {}",
            self.remote_addr,
            self.time_local(),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.bytes_field(),
        )
    }

    fn format_json(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "content_length": self.content_length,
            "content_encoding": self.content_encoding,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": u64::try_from(self.elapsed.as_micros()).unwrap_or(u64::MAX),
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$request_time`
    /// (seconds, 3 decimals), `$status`, `$body_bytes_sent`,
    /// `$content_encoding`, `$http_referer`, `$http_user_agent`.
    fn format_custom(&self, pattern: &str) -> String {
        let request_uri = self.request_uri();
        let request_line = format!("{} {} {}", self.method, request_uri, self.http_version);

        // Longer variables first: $request_time and $request_uri before $request
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$time_local", &self.time_local())
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace(
                "$request_time",
                &format!("{:.3}", self.elapsed.as_secs_f64()),
            )
            .replace("$request_method", &self.method)
            .replace("$request_uri", &request_uri)
            .replace("$request", &request_line)
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes_sent", &self.bytes_field())
            .replace(
                "$content_encoding",
                self.content_encoding.as_deref().unwrap_or("-"),
            )
            .replace("$http_referer", self.referer.as_deref().unwrap_or("-"))
            .replace("$http_user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let req = Request::builder()
            .method("GET")
            .uri("/assets/app.js?v=3")
            .header(REFERER, "https://example.com")
            .header(USER_AGENT, "Mozilla/5.0")
            .body(())
            .unwrap();
        let resp = Response::builder()
            .status(200)
            .header(CONTENT_LENGTH, 1234)
            .body(())
            .unwrap();
        AccessLogEntry::new(
            "192.168.1.1:50000".parse().unwrap(),
            &req,
            &resp,
            Duration::from_micros(1500),
        )
    }

    #[test]
    fn test_entry_from_request() {
        let entry = create_test_entry();
        assert_eq!(entry.remote_addr, "192.168.1.1");
        assert_eq!(entry.path, "/assets/app.js");
        assert_eq!(entry.query.as_deref(), Some("v=3"));
        assert_eq!(entry.http_version, "HTTP/1.1");
        assert_eq!(entry.content_length, Some(1234));
        assert!(entry.content_encoding.is_none());
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.contains("192.168.1.1"));
        assert!(log.contains("\"GET /assets/app.js?v=3 HTTP/1.1\""));
        assert!(log.contains("200 1234"));
        assert!(log.contains("https://example.com"));
        assert!(log.contains("Mozilla/5.0"));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("GET /assets/app.js?v=3 HTTP/1.1"));
        assert!(log.contains("200 1234"));
        // Common format does not include referer/user-agent
        assert!(!log.contains("https://example.com"));
    }

    #[test]
    fn test_unknown_length_logged_as_dash() {
        let mut entry = create_test_entry();
        entry.content_length = None;
        entry.content_encoding = Some("gzip".to_string());
        assert!(entry.format("common").ends_with("200 -"));
        assert_eq!(entry.format("$status $body_bytes_sent $content_encoding"), "200 - gzip");
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "192.168.1.1");
        assert_eq!(value["method"], "GET");
        assert_eq!(value["status"], 200);
        assert_eq!(value["content_length"], 1234);
        assert_eq!(value["request_time_us"], 1500);
        assert!(value["content_encoding"].is_null());
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$remote_addr - $status - $request_time - $request_uri");
        assert_eq!(log, "192.168.1.1 - 200 - 0.002 - /assets/app.js?v=3");
    }
}
