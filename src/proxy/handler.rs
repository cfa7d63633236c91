//! Gateway orchestrator: gate → forward → redact.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;

use crate::observability::metrics;
use crate::policy::{gate, PolicyHandle};
use crate::proxy::upstream::UpstreamClient;
use crate::redact;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<PolicyHandle>,
    pub upstream: Arc<UpstreamClient>,
}

/// Main gateway handler.
///
/// Applies the inbound gate, forwards to the origin, and runs the redactor
/// before bytes stream back to the caller. Blocked requests never reach
/// the upstream client.
pub async fn gateway_handler(
    State(state): State<AppState>,
    request: axum::extract::Request,
) -> Response<Body> {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().to_string();

    // The snapshot is held for the whole exchange; a reload mid-request
    // cannot mix two policies.
    let policy = state.policy.load();

    if gate::should_block(&request, &policy) {
        tracing::debug!(request_id = %request_id, "Blocking request due to policy rules");
        metrics::record_blocked();
        metrics::record_request(&method, StatusCode::FORBIDDEN.as_u16(), start_time);
        return (StatusCode::FORBIDDEN, gate::BLOCKED_MESSAGE).into_response();
    }

    let response = match state.upstream.forward(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_request(&method, StatusCode::BAD_GATEWAY.as_u16(), start_time);
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };

    match redact::modify_response(response, policy.masked_keys()).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to modify upstream response");
            metrics::record_request(&method, StatusCode::BAD_GATEWAY.as_u16(), start_time);
            (StatusCode::BAD_GATEWAY, "Failed to process upstream response").into_response()
        }
    }
}
