//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Level comes from `ObservabilityConfig::debug`; `RUST_LOG` overrides it

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directive for the configured verbosity.
pub fn default_directive(config: &ObservabilityConfig) -> &'static str {
    if config.debug {
        "frontend_proxy=debug,tower_http=debug,info"
    } else {
        "info"
    }
}

/// Install the global subscriber. Diagnostics go to stderr.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));
    let span_events = if config.tracing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.pretty {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_span_events(span_events)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_span_events(span_events)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flag_selects_directive() {
        let mut config = ObservabilityConfig::default();
        assert_eq!(default_directive(&config), "info");
        config.debug = true;
        assert!(default_directive(&config).contains("frontend_proxy=debug"));
    }
}
