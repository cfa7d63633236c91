//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! request → handler.rs (gate → forward → redact)
//!     → upstream.rs (director: URI/Host rewrite, then the hop)
//!     → redact::modify_response (post-receive step)
//!     → response to caller
//! ```

pub mod handler;
pub mod upstream;

pub use handler::{gateway_handler, AppState};
pub use upstream::{UpstreamClient, UpstreamError};
