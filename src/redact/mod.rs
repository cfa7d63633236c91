//! Sensitive-data redaction for upstream responses.
//!
//! # Data Flow
//! ```text
//! upstream response
//!     → buffer whole body (no streaming redaction)
//!     → masker.rs (classify as JSON, mask configured keys)
//!     → Masked: new body + rewritten Content-Length
//!     → Unmodified: original bytes, original Content-Length
//!     → read/serialize failure: exchange fails, never retried
//! ```
//!
//! Runs as the post-receive step, before any byte streams to the caller.

pub mod masker;

use std::collections::HashSet;

use axum::body::Body;
use axum::http::{header, HeaderValue, Response};

pub use masker::{redact_body, RedactError, RedactionOutcome, MASK_CHAR};

/// Limit for buffering upstream response bodies.
///
/// Bounded by whatever the origin returns; the surrounding transport
/// timeouts are the real backstop for a misbehaving origin.
const BODY_LIMIT: usize = usize::MAX;

/// Rewrite a response body, masking configured JSON keys.
///
/// JSON bodies are replaced with the re-serialized masked document and
/// `Content-Length` is overwritten to the new byte length so framing never
/// goes stale. Non-JSON bodies pass through byte-for-byte with their
/// original headers.
pub async fn modify_response(
    response: Response<Body>,
    masked_keys: &HashSet<String>,
) -> Result<Response<Body>, RedactError> {
    let (mut parts, body) = response.into_parts();

    let bytes = axum::body::to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|e| RedactError::Read(e.to_string()))?;
    let original_len = bytes.len();

    match redact_body(bytes, masked_keys)? {
        RedactionOutcome::Masked(text) => {
            parts
                .headers
                .insert(header::CONTENT_LENGTH, HeaderValue::from(text.len()));
            tracing::debug!(
                original_content_length = original_len,
                modified_content_length = text.len(),
                "Response body masked"
            );
            Ok(Response::from_parts(parts, Body::from(text)))
        }
        RedactionOutcome::Unmodified(bytes) => Ok(Response::from_parts(parts, Body::from(bytes))),
    }
}
