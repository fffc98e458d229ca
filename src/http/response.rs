//! HTTP response body and builder module
//!
//! Every response carries a `ServeBody`: an unsync boxed body so that empty,
//! in-memory, streamed and gzip-streamed bodies share one type.

use crate::http::gzip::GzipStream;
use futures_util::{TryFutureExt, TryStreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::Response;
use std::io;
use std::path::PathBuf;
use tokio_util::io::ReaderStream;

/// Response body type produced by the static file handler
pub type ServeBody = UnsyncBoxBody<Bytes, io::Error>;

/// Empty body for 304 and HEAD responses
pub fn empty_body() -> ServeBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// In-memory body
pub fn full_body(data: impl Into<Bytes>) -> ServeBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream a file's bytes, optionally through gzip
///
/// The file is opened on first poll; open and read failures surface as body
/// stream errors.
pub fn file_body(path: PathBuf, gzip: bool) -> ServeBody {
    let chunks = tokio::fs::File::open(path)
        .map_ok(ReaderStream::new)
        .try_flatten_stream();

    if gzip {
        StreamBody::new(GzipStream::new(chunks).map_ok(Frame::data)).boxed_unsync()
    } else {
        StreamBody::new(chunks.map_ok(Frame::data)).boxed_unsync()
    }
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ServeBody> {
    build_text_response(404, "404 Not Found")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<ServeBody> {
    build_text_response(500, "500 Internal Server Error")
}

fn build_text_response(status: u16, text: &'static str) -> Response<ServeBody> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, text.len())
        .body(full_body(text))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(full_body(text))
        })
}

/// Log response build error
fn log_build_error(status: u16, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    async fn collect(body: ServeBody) -> io::Result<Bytes> {
        body.collect().await.map(http_body_util::Collected::to_bytes)
    }

    #[tokio::test]
    async fn test_file_body_streams_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello static world").unwrap();

        let bytes = collect(file_body(file.path().to_path_buf(), false))
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"hello static world");
    }

    #[tokio::test]
    async fn test_file_body_missing_file_is_stream_error() {
        let dir = tempfile::tempdir().unwrap();
        let body = file_body(dir.path().join("missing.txt"), false);
        let err = collect(body).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_404_response() {
        let resp = build_404_response();
        assert_eq!(resp.status(), 404);
        let bytes = collect(resp.into_body()).await.unwrap();
        assert_eq!(&bytes[..], b"404 Not Found");
    }

    #[tokio::test]
    async fn test_empty_body() {
        let bytes = collect(empty_body()).await.unwrap();
        assert!(bytes.is_empty());
    }
}
