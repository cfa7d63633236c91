//! Traffic recording middleware.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → drain single-consumption body into an owned buffer
//!     → emit request record {timestamp, method, path, query, headers, body}
//!     → splice a rewound view of the buffer back as the request body
//!     → run the inner handler chain
//!     → wrap the response body in CaptureBody
//!     → completion record {status, size, duration_ms, headers, body}
//!       emitted when the stream ends
//! ```
//!
//! # Design Decisions
//! - Recording never alters what the handler or the caller observes:
//!   frames are forwarded first, copied second
//! - A request body that cannot be drained aborts the exchange; the log
//!   never carries a fabricated body
//! - Header/body serialization failures are logged as their own error
//!   events and leave the field empty, never failing the request

pub mod capture;

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{header, request::Parts, HeaderMap, HeaderValue, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use std::collections::BTreeMap;

pub use capture::{CaptureBody, ResponseCapture};

/// Limit for buffering request bodies.
///
/// The transport's connection/read timeouts bound a slow or endless body.
const BODY_LIMIT: usize = usize::MAX;

/// Record one full exchange without altering its observable behavior.
pub async fn record_traffic(request: Request, next: Next) -> Response<Body> {
    let started = Instant::now();
    let (parts, body) = request.into_parts();

    // The body stream is single-consumption: drain it fully up front, log
    // from the owned buffer, then hand the handler a rewound view of the
    // same bytes.
    let body_bytes = match axum::body::to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read request body; aborting exchange");
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };

    record_request(&parts, &body_bytes);

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let capture = CaptureBody::new(body, parts.status, parts.headers.clone(), started);
    Response::from_parts(parts, Body::new(capture))
}

/// Emit the request-received record.
fn record_request(parts: &Parts, body: &Bytes) {
    let mut headers = parts.headers.clone();
    if !headers.contains_key(header::CONTENT_LENGTH) {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    }
    if !headers.contains_key(header::HOST) {
        if let Some(authority) = parts.uri.authority() {
            if let Ok(value) = HeaderValue::from_str(authority.as_str()) {
                headers.insert(header::HOST, value);
            }
        }
    }

    let header_json = match serialize_headers(&headers) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize request headers");
            String::new()
        }
    };

    tracing::info!(
        timestamp = unix_timestamp(),
        method = %parts.method,
        path = parts.uri.path(),
        query = parts.uri.query().unwrap_or(""),
        headers = %header_json,
        body = %String::from_utf8_lossy(body),
        "Record request"
    );
}

/// Serialize a header map to a JSON object of name → value list.
///
/// Non-UTF-8 header values are replaced lossily rather than dropped.
pub(crate) fn serialize_headers(headers: &HeaderMap) -> Result<String, serde_json::Error> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers.iter() {
        map.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    serde_json::to_string(&map)
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
