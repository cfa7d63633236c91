//! Inbound gate: decides whether a request is forwarded at all.
//!
//! # Design Decisions
//! - Only GET requests are gated unless `gateAllMethods` is set; the
//!   asymmetry is inherited from the source policy and kept as an explicit
//!   configuration choice
//! - Header test runs before the query test, but the result is a boolean
//!   OR of two membership checks, so order does not affect correctness
//! - Blocked requests never reach the upstream client

use axum::http::{Method, Request};

use crate::policy::snapshot::PolicySnapshot;

/// Fixed response body for requests rejected by policy.
pub const BLOCKED_MESSAGE: &str = "Request blocked by proxy rules";

/// Decide whether the request must be rejected before forwarding.
///
/// Pure over an immutable request and snapshot: calling it twice with the
/// same inputs yields the same decision.
pub fn should_block<B>(req: &Request<B>, policy: &PolicySnapshot) -> bool {
    if req.method() != Method::GET && !policy.gate_all_methods() {
        return false;
    }

    for name in req.headers().keys() {
        if policy.is_header_blocked(name.as_str()) {
            tracing::debug!(blocked_header = %name, "Request matched header blocklist");
            return true;
        }
    }

    if let Some(query) = req.uri().query() {
        for (name, _) in url::form_urlencoded::parse(query.as_bytes()) {
            if policy.is_query_param_blocked(&name) {
                tracing::debug!(blocked_query_param = %name, "Request matched query blocklist");
                return true;
            }
        }
    }

    false
}
