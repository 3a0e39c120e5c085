//! Routing subsystem: which namespace and which object a request targets.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, normalized path)
//!     → domain.rs (host → Namespace, or DomainMismatch)
//!     → key.rs (normalized path → object key inside the namespace)
//!     → ResolvedTarget { bucket, key }
//! ```
//!
//! # Design Decisions
//! - Resolution is recomputed per request from the live Host header, never cached
//! - Host matching is case-insensitive, path mapping is case-sensitive
//! - Keys are decoded and checked for traversal before any store access
//! - Every key produced for a namespace starts with that namespace's prefix

pub mod domain;
pub mod key;
pub mod namespace;

pub use domain::DomainResolver;
pub use key::resolve_target;
pub use namespace::{Namespace, ResolvedTarget};
