//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events, incl. traffic records)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Traffic records are plain tracing events with a fixed field contract;
//!   downstream log consumers depend on the field names
//! - Metrics are cheap (atomic increments) and never on an error path

pub mod logging;
pub mod metrics;
