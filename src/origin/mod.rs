//! Object serving subsystem.
//!
//! # Data Flow
//! ```text
//! RequestContext (namespace, normalized path)
//!     → routing::key (path → object key, traversal rejected)
//!     → resilience::retries (bounded fetch, one retry on transient errors)
//!     → found:     stream the object (server.rs)
//!     → not found: fallback.rs decides between the index document and 404
//!     → failure:   classified store error → 502 / 503 / 500
//! ```
//!
//! # Design Decisions
//! - The store is only reached after the namespace and key are both valid
//! - Bodies are streamed, never buffered; every chunk wait is bounded
//! - Every failure path reports to the observer before answering

pub mod fallback;
pub mod server;

pub use fallback::SpaPolicy;
pub use server::ObjectServer;
