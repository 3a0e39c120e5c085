//! Request pipeline stages.
//!
//! # Data Flow
//! ```text
//! Request
//!     → trailing_slash.rs (canonical path, request context)
//!     → skip.rs (exempt liveness paths opt out of every stage below)
//!     → access_log.rs (correlation id, timer, record on completion)
//!     → domain.rs (host → namespace)
//!     → object server / liveness handler
//! ```
//!
//! # Design Decisions
//! - The normalizer runs before routing so the router only sees canonical paths
//! - Each stage consults the skip flag itself instead of being conditionally mounted

pub mod access_log;
pub mod domain;
pub mod skip;
pub mod trailing_slash;

pub use access_log::{log_access, CountingBody, PendingRecord};
pub use domain::resolve_domain;
pub use skip::{is_exempt, HEALTHZ_PREFIX};
pub use trailing_slash::{canonical_path, normalize_request};
