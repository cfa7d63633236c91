//! Response capture: a decorator over the response body stream.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use hyper::body::{Body as HttpBody, Frame, SizeHint};

use crate::recorder::serialize_headers;

/// Per-request record of what was actually delivered to the caller.
///
/// `bytes_written` is the sum of the sizes of all data frames passed
/// through, and `body` is a faithful concatenation of every such frame;
/// it never diverges from what the caller received.
#[derive(Debug, Default)]
pub struct ResponseCapture {
    status: u16,
    bytes_written: usize,
    body: Vec<u8>,
}

impl ResponseCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the response status. The first recorded status wins.
    pub fn record_status(&mut self, code: u16) {
        if self.status == 0 {
            self.status = code;
        }
    }

    /// Record a chunk after it has been forwarded to the caller.
    pub fn record_write(&mut self, chunk: &[u8]) {
        self.body.extend_from_slice(chunk);
        self.bytes_written += chunk.len();
    }

    /// Recorded status code; 0 if none was recorded yet.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Running total of delivered body bytes.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Copy of the delivered body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Body decorator that copies data frames as they stream to the caller.
///
/// Frames are handed through unchanged and only then appended to the
/// capture, so a capture-side problem can never corrupt or duplicate what
/// was sent. Errors from the inner body propagate unchanged.
///
/// The completion record is emitted exactly once: at end-of-stream, or on
/// drop for streams the caller abandoned.
pub struct CaptureBody {
    inner: Body,
    capture: ResponseCapture,
    headers: HeaderMap,
    started: Instant,
    finished: bool,
}

impl CaptureBody {
    pub fn new(inner: Body, status: StatusCode, headers: HeaderMap, started: Instant) -> Self {
        let mut capture = ResponseCapture::new();
        capture.record_status(status.as_u16());
        Self {
            inner,
            capture,
            headers,
            started,
            finished: false,
        }
    }

    /// The capture accumulated so far.
    pub fn capture(&self) -> &ResponseCapture {
        &self.capture
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        let headers = match serialize_headers(&self.headers) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response headers");
                String::new()
            }
        };

        tracing::info!(
            status = self.capture.status(),
            size = self.capture.bytes_written(),
            duration_ms = self.started.elapsed().as_millis() as u64,
            headers = %headers,
            body = %String::from_utf8_lossy(self.capture.body()),
            "Request completed"
        );
    }
}

impl HttpBody for CaptureBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => {
                let frame = match frame.into_data() {
                    Ok(data) => {
                        this.capture.record_write(&data);
                        Frame::data(data)
                    }
                    Err(frame) => frame,
                };
                Poll::Ready(Some(Ok(frame)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finish();
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finish();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for CaptureBody {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[test]
    fn test_status_first_write_wins() {
        let mut capture = ResponseCapture::new();
        assert_eq!(capture.status(), 0);
        capture.record_status(200);
        capture.record_status(500);
        assert_eq!(capture.status(), 200);
    }

    #[test]
    fn test_byte_count_sums_all_writes() {
        let mut capture = ResponseCapture::new();
        capture.record_write(b"abc");
        capture.record_write(b"");
        capture.record_write(b"defg");
        assert_eq!(capture.bytes_written(), 7);
        assert_eq!(capture.body(), b"abcdefg");
    }

    #[tokio::test]
    async fn test_capture_matches_delivered_multi_chunk_body() {
        let chunks = vec![
            Ok::<_, std::io::Error>(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"wor")),
            Ok(Bytes::from_static(b"ld")),
        ];
        let inner = Body::from_stream(stream::iter(chunks));
        let mut body = CaptureBody::new(inner, StatusCode::OK, HeaderMap::new(), Instant::now());

        let mut delivered = Vec::new();
        while let Some(frame) =
            std::future::poll_fn(|cx| Pin::new(&mut body).poll_frame(cx)).await
        {
            if let Ok(data) = frame.unwrap().into_data() {
                delivered.extend_from_slice(&data);
            }
        }

        assert_eq!(delivered, b"hello world");
        assert_eq!(body.capture().body(), b"hello world");
        assert_eq!(body.capture().bytes_written(), delivered.len());
        assert_eq!(body.capture().status(), 200);
    }

    #[tokio::test]
    async fn test_empty_body_captures_nothing() {
        let mut body = CaptureBody::new(
            Body::empty(),
            StatusCode::NO_CONTENT,
            HeaderMap::new(),
            Instant::now(),
        );

        let frame = std::future::poll_fn(|cx| Pin::new(&mut body).poll_frame(cx)).await;
        assert!(frame.is_none());
        assert_eq!(body.capture().bytes_written(), 0);
        assert_eq!(body.capture().status(), 204);
    }
}
