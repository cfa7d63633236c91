//! Immutable policy snapshots and their shared holder.

use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::GatewayConfig;

/// Immutable-after-construction view of the blocking and masking policy.
///
/// Header names are stored in the canonical form used on the wire by the
/// `http` stack (lowercase); membership tests are case-sensitive against
/// that form. Query parameter names and mask keys are byte-exact.
#[derive(Debug, Default)]
pub struct PolicySnapshot {
    blocked_headers: HashSet<String>,
    blocked_query_params: HashSet<String>,
    masked_keys: HashSet<String>,
    gate_all_methods: bool,
}

impl PolicySnapshot {
    /// Build a snapshot from a validated configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            blocked_headers: config
                .blocked_headers
                .iter()
                .map(|name| name.to_lowercase())
                .collect(),
            blocked_query_params: config.blocked_query_params.iter().cloned().collect(),
            masked_keys: config.masked_needed_keys.iter().cloned().collect(),
            gate_all_methods: config.gate_all_methods,
        }
    }

    /// True if the given wire-form header name is blocklisted.
    pub fn is_header_blocked(&self, name: &str) -> bool {
        self.blocked_headers.contains(name)
    }

    /// True if the given query parameter name is blocklisted.
    pub fn is_query_param_blocked(&self, name: &str) -> bool {
        self.blocked_query_params.contains(name)
    }

    /// The set of JSON object keys whose string values are masked.
    pub fn masked_keys(&self) -> &HashSet<String> {
        &self.masked_keys
    }

    /// Whether the inbound gate applies to every method instead of GET only.
    pub fn gate_all_methods(&self) -> bool {
        self.gate_all_methods
    }
}

/// Shared holder for the current policy snapshot.
///
/// Reads are lock-free; reload replaces the whole snapshot atomically, so
/// request workers never observe a partially updated policy.
#[derive(Debug)]
pub struct PolicyHandle {
    inner: ArcSwap<PolicySnapshot>,
}

impl PolicyHandle {
    /// Create a handle holding the given snapshot.
    pub fn new(snapshot: PolicySnapshot) -> Self {
        Self {
            inner: ArcSwap::from_pointee(snapshot),
        }
    }

    /// Get the current snapshot.
    ///
    /// The returned `Arc` stays valid for the caller even if the snapshot
    /// is replaced mid-request.
    pub fn load(&self) -> Arc<PolicySnapshot> {
        self.inner.load_full()
    }

    /// Replace the snapshot wholesale.
    pub fn replace(&self, snapshot: PolicySnapshot) {
        self.inner.store(Arc::new(snapshot));
    }
}
