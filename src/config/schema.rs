//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! The top-level field names (`targetUrl`, `targetPort`, `blockedHeaders`,
//! `blockedQueryParams`, `maskedNeededKeys`) are an external contract shared
//! with downstream config tooling and must not change.

use serde::{Deserialize, Serialize};

/// Root configuration for the policy gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Upstream origin base URL (scheme + host, e.g. "http://127.0.0.1").
    pub target_url: String,

    /// Upstream origin port, appended to `target_url`.
    pub target_port: String,

    /// Header names that cause a gated request to be rejected.
    pub blocked_headers: Vec<String>,

    /// Query parameter names that cause a gated request to be rejected.
    pub blocked_query_params: Vec<String>,

    /// JSON object keys whose string values are masked in responses.
    pub masked_needed_keys: Vec<String>,

    /// Apply the inbound gate to every method instead of GET only.
    pub gate_all_methods: bool,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            target_url: "http://127.0.0.1".to_string(),
            target_port: "9000".to_string(),
            blocked_headers: Vec::new(),
            blocked_query_params: Vec::new(),
            masked_needed_keys: Vec::new(),
            gate_all_methods: false,
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Timeout configuration for request handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
