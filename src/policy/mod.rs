//! Policy subsystem.
//!
//! # Data Flow
//! ```text
//! GatewayConfig
//!     → snapshot.rs (list → set, header canonicalization)
//!     → PolicySnapshot (immutable, O(1) membership)
//!     → PolicyHandle (lock-free shared access, wholesale swap on reload)
//!
//! Per request:
//!     gate.rs consumes the request + a snapshot and decides block/forward
//! ```
//!
//! # Design Decisions
//! - Snapshots are never mutated after a request worker observes them;
//!   reload replaces the whole snapshot atomically
//! - Membership tests are case-sensitive against canonical names

pub mod gate;
pub mod snapshot;

pub use gate::{should_block, BLOCKED_MESSAGE};
pub use snapshot::{PolicyHandle, PolicySnapshot};
