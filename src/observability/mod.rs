//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured diagnostics on stderr)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (request spans with correlation IDs)
//!
//! Per request:
//!     → access_log.rs (one JSON record per non-exempt request, stdout)
//!     → hooks.rs (summary / error callbacks from the object server)
//! ```
//!
//! # Design Decisions
//! - Access records are a separate stream from diagnostics
//! - Correlation ID flows from the inbound header into every record
//! - Log level is chosen from config at startup, never mutated afterwards

pub mod access_log;
pub mod hooks;
pub mod logging;
pub mod metrics;
pub mod tracing;

pub use access_log::{AccessLogRecord, AccessLogSink, StdoutSink};
pub use hooks::{Observer, ServeSummary, TracingObserver};
