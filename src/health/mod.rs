//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! GET /healthz
//!     → normalizer passes the path through unchanged
//!     → access logger and domain resolver see the skip flag
//!     → liveness.rs answers {"msg":"ok","version":...}
//! ```
//!
//! # Design Decisions
//! - Liveness never touches the object store; it reports the process is up
//! - The body is static apart from the build version

pub mod liveness;

pub use liveness::{liveness, LivenessBody};
