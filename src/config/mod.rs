//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags / environment (cli.rs)
//!     + optional TOML file (loader.rs)
//!     → merged GatewayConfig
//!     → validation.rs (semantic checks, all errors collected)
//!     → shared via Arc, read-only for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - CLI/env values override file values
//! - Log level is a config field, not global state

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{load_config, ConfigError};
pub use schema::{
    parse_bind_address, DeploymentConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, RetryConfig,
    SiteConfig, SpaConfig, StoreConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
