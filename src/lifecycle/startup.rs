//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics listener when configured
//! - Build the object store client
//! - Bind the listener and serve until a termination signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::build_info;
use crate::config::{parse_bind_address, GatewayConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_listener;
use crate::observability::metrics;
use crate::storage::S3Store;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid address {0:?}")]
    Address(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Start every subsystem for `config` and serve until shutdown.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    let deployment = &config.deployment;
    tracing::info!(
        version = build_info::version(),
        build = ?build_info::info(),
        stage = %deployment.stage,
        branch = %deployment.branch,
        app_name = %deployment.app_name,
        "frontend-proxy starting"
    );

    if let Some(metrics_address) = &config.observability.metrics_address {
        let addr = parse_bind_address(metrics_address)
            .map_err(|_| StartupError::Address(metrics_address.clone()))?;
        metrics::init_metrics(addr);
    }

    let store = Arc::new(S3Store::connect(&config.store).await);

    let addr = config
        .listener
        .socket_addr()
        .map_err(|_| StartupError::Address(config.listener.bind_address.clone()))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    tracing::info!(address = %addr, "starting listener");

    let shutdown = Shutdown::new();
    let signals = spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, store);
    server.run(listener, shutdown.subscribe()).await?;
    signals.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
