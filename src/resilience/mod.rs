//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Object fetch:
//!     → timeouts.rs (deadline per attempt and per body chunk)
//!     → On transient failure: retries.rs (one bounded retry after backoff.rs delay)
//!     → Result handed back to the object server
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every store call has a deadline
//! - At most one retry, and only for transient errors
//! - Not found and fatal errors are returned immediately

pub mod backoff;
pub mod retries;
pub mod timeouts;
