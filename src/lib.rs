//! Frontend proxy: serves single-page applications out of an object store.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ normalizer ──▶ access log ──▶ domain ──▶ object server ──▶ S3
//!                     (trailing /)   (skip /healthz) resolver   (SPA fallback)
//!                          │
//!                          └──▶ /healthz ──▶ liveness {"msg":"ok","version":...}
//!
//!     Cross-cutting: config │ observability │ resilience │ lifecycle
//! ```

pub mod build_info;
pub mod config;
pub mod error;
pub mod http;
pub mod routing;
pub mod storage;

pub mod health;
pub mod origin;

pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
