//! Error types for the static file handler

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of the current request
///
/// Misses and traversal attempts are not errors; they hand the request to the
/// next handler instead.
#[derive(Debug, Error)]
pub enum ServeError {
    /// A cached file could no longer be stat'ed
    #[error("cached file for '{request_path}' vanished from '{}': {source}", disk_path.display())]
    Vanished {
        request_path: String,
        disk_path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Response headers could not be assembled, e.g. an invalid configured header value
    #[error("failed to build response: {0}")]
    Http(#[from] hyper::http::Error),
}
