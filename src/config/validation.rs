//! Configuration validation.
//!
//! Returns every problem found, not just the first.

use axum::http::HeaderName;
use std::fmt;

use crate::config::schema::{parse_bind_address, GatewayConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a merged configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if parse_bind_address(&config.listener.bind_address).is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("invalid address {:?}", config.listener.bind_address),
        ));
    }

    let domain = config.site.domain_name.trim();
    if domain.is_empty() {
        errors.push(ValidationError::new("site.domain_name", "must not be empty"));
    } else if domain.contains('/') || domain.contains(':') {
        errors.push(ValidationError::new(
            "site.domain_name",
            "must be a bare host name without scheme or port",
        ));
    }

    let bucket_name = config.site.bucket.split('/').next().unwrap_or_default();
    if bucket_name.trim().is_empty() {
        errors.push(ValidationError::new("site.bucket", "must not be empty"));
    }
    if config.site.bucket.split('/').any(|segment| segment == "..") {
        errors.push(ValidationError::new("site.bucket", "prefix must not contain '..'"));
    }

    let index = &config.site.spa.index_document;
    if index.is_empty() || index.contains('/') {
        errors.push(ValidationError::new(
            "site.spa.index_document",
            "must be a plain file name",
        ));
    }

    if HeaderName::from_bytes(config.observability.request_id_header.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "observability.request_id_header",
            format!("invalid header name {:?}", config.observability.request_id_header),
        ));
    }

    if let Some(addr) = &config.observability.metrics_address {
        if parse_bind_address(addr).is_err() {
            errors.push(ValidationError::new(
                "observability.metrics_address",
                format!("invalid address {addr:?}"),
            ));
        }
    }

    if !(1..=2).contains(&config.store.retry.max_attempts) {
        errors.push(ValidationError::new(
            "store.retry.max_attempts",
            "must be 1 or 2 (at most one retry)",
        ));
    }
    if config.store.fetch_timeout_ms == 0 || config.store.chunk_timeout_ms == 0 {
        errors.push(ValidationError::new("store", "timeouts must be greater than zero"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than zero",
        ));
    } else {
        // An index fallback runs a second fetch sequence after the first miss.
        let needed_ms = worst_case_fetch_ms(config).saturating_mul(2);
        if config.timeouts.request_secs.saturating_mul(1000) <= needed_ms {
            errors.push(ValidationError::new(
                "timeouts.request_secs",
                format!(
                    "must exceed the store fetch budget of {needed_ms}ms \
                     (fetch timeout, retry and index fallback)"
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Longest a single fetch sequence can take: every attempt hits its deadline
/// and the retry waits the maximum jittered delay.
fn worst_case_fetch_ms(config: &GatewayConfig) -> u64 {
    let store = &config.store;
    let attempts = if store.retry.enabled {
        u64::from(store.retry.max_attempts.clamp(1, 2))
    } else {
        1
    };
    let max_delay = store.retry.max_delay_ms.saturating_add(store.retry.max_delay_ms / 10);
    store
        .fetch_timeout_ms
        .saturating_mul(attempts)
        .saturating_add(max_delay.saturating_mul(attempts - 1))
}
