//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, state, graceful shutdown)
//!     → middleware/ (normalize, skip, access log, resolve domain)
//!     → request.rs (request context, correlation id, client address)
//!     → origin::ObjectServer or health::liveness
//!     → response.rs (object headers, HEAD handling)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::RequestContext;
pub use server::{AppState, GatewayService, HttpServer};
