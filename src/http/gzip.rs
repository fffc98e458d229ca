//! Streaming gzip encoder
//!
//! Compresses a byte stream chunk by chunk with flate2, so the full file is
//! never held in memory.

use flate2::write::GzEncoder;
use flate2::Compression;
use futures_util::Stream;
use hyper::body::Bytes;
use std::io::{self, Write};
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Gzip adapter over a stream of byte chunks
pub struct GzipStream<S> {
    inner: Pin<Box<S>>,
    encoder: Option<GzEncoder<Vec<u8>>>,
}

impl<S> GzipStream<S>
where
    S: Stream<Item = io::Result<Bytes>>,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner: Box::pin(inner),
            encoder: Some(GzEncoder::new(Vec::new(), Compression::default())),
        }
    }
}

impl<S> Stream for GzipStream<S>
where
    S: Stream<Item = io::Result<Bytes>>,
{
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            let Some(encoder) = this.encoder.as_mut() else {
                return Poll::Ready(None);
            };

            match ready!(this.inner.as_mut().poll_next(cx)) {
                Some(Ok(chunk)) => {
                    if let Err(e) = encoder.write_all(&chunk) {
                        this.encoder = None;
                        return Poll::Ready(Some(Err(e)));
                    }
                    let compressed = std::mem::take(encoder.get_mut());
                    // Deflate buffers small inputs, keep reading until it emits
                    if !compressed.is_empty() {
                        return Poll::Ready(Some(Ok(Bytes::from(compressed))));
                    }
                }
                Some(Err(e)) => {
                    this.encoder = None;
                    return Poll::Ready(Some(Err(e)));
                }
                None => {
                    let trailer = this.encoder.take().map(GzEncoder::finish);
                    return Poll::Ready(trailer.map(|r| r.map(Bytes::from)));
                }
            }
        }
    }
}
