//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, SocketAddr};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Which domain is served and from which bucket.
    pub site: SiteConfig,

    /// Object store client settings.
    pub store: StoreConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Deployment labels reported at startup.
    pub deployment: DeploymentConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address. `:8000` binds every interface on port 8000.
    pub bind_address: String,

    /// Maximum accepted request body in bytes. The gateway is read-only.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: ":8000".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ListenerConfig {
    /// Parse the bind address, expanding the `:port` shorthand.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        parse_bind_address(&self.bind_address)
    }
}

/// Parse a bind address; a bare `:port` means all interfaces.
pub fn parse_bind_address(addr: &str) -> Result<SocketAddr, AddrParseError> {
    match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}").parse(),
        None => addr.parse(),
    }
}

/// The site being served.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base domain, e.g. "example.com".
    pub domain_name: String,

    /// Bucket name, optionally followed by a base prefix ("bucket/sites").
    pub bucket: String,

    /// Map `<label>.<domain>` onto the `<label>/` prefix of the bucket.
    pub subdomain_mode: bool,

    /// Single-page application fallback.
    pub spa: SpaConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain_name: String::new(),
            bucket: String::new(),
            subdomain_mode: true,
            spa: SpaConfig::default(),
        }
    }
}

/// SPA fallback settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpaConfig {
    /// Serve the index document for missing non-asset paths.
    pub enabled: bool,

    /// Document served for directories and as the SPA shell.
    pub index_document: String,

    /// Extensions treated as static assets (never fall back).
    /// Empty means any final segment with an extension is an asset.
    pub asset_extensions: Vec<String>,
}

impl Default for SpaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            index_document: "index.html".to_string(),
            asset_extensions: Vec::new(),
        }
    }
}

/// Object store client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// AWS region; the ambient provider chain is used when unset.
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores.
    pub endpoint: Option<String>,

    /// Path-style addressing (MinIO and friends).
    pub force_path_style: bool,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Deadline for a single fetch attempt (until headers arrive) in milliseconds.
    pub fetch_timeout_ms: u64,

    /// Maximum wait for the next body chunk in milliseconds.
    pub chunk_timeout_ms: u64,

    /// Retry behaviour for transient failures.
    pub retry: RetryConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            force_path_style: false,
            connect_timeout_ms: 3_000,
            fetch_timeout_ms: 5_000,
            chunk_timeout_ms: 30_000,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable the retry on transient store errors.
    pub enabled: bool,

    /// Total attempts including the first. Must be 1 or 2.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 2,
            base_delay_ms: 50,
            max_delay_ms: 500,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request deadline (until response headers) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Debug-level diagnostics.
    pub debug: bool,

    /// Human-readable diagnostics instead of JSON.
    pub pretty: bool,

    /// Emit span close events for request spans.
    pub tracing: bool,

    /// Inbound header carrying the correlation id.
    pub request_id_header: String,

    /// Prometheus scrape listener; disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            debug: false,
            pretty: false,
            tracing: false,
            request_id_header: "X-Amzn-Trace-Id".to_string(),
            metrics_address: None,
        }
    }
}

/// Labels describing where this instance is deployed.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeploymentConfig {
    pub stage: String,
    pub branch: String,
    pub app_name: String,
}
