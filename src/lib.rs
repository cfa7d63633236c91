//! Policy-Enforcing Gateway Library
//!
//! A reverse proxy that forwards traffic to a single upstream origin while
//! inspecting, blocking, redacting, and recording it per a process-wide
//! policy.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌─────────────────────────────────────────────────┐
//!                        │                 POLICY GATEWAY                  │
//!                        │                                                 │
//!     Client Request     │  ┌──────────┐   ┌─────────┐   ┌─────────────┐  │
//!     ───────────────────┼─▶│ traffic  │──▶│ inbound │──▶│  upstream   │──┼──▶ Origin
//!                        │  │ recorder │   │  gate   │   │   client    │  │
//!                        │  └──────────┘   └─────────┘   └──────┬──────┘  │
//!                        │        ▲         403 on block        │         │
//!     Client Response    │        │                             ▼         │
//!     ◀──────────────────┼────────┤                      ┌─────────────┐  │
//!                        │        └──────────────────────│  redactor   │  │
//!                        │        capture + completion   │ (JSON mask) │  │
//!                        │        record                 └─────────────┘  │
//!                        │                                                 │
//!                        │  ┌───────────────────────────────────────────┐ │
//!                        │  │ config │ policy snapshot │ observability  │ │
//!                        │  │ lifecycle (signals, graceful shutdown)    │ │
//!                        │  └───────────────────────────────────────────┘ │
//!                        └─────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod policy;
pub mod proxy;

// Interception pipeline
pub mod recorder;
pub mod redact;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use policy::{PolicyHandle, PolicySnapshot};
