use clap::Parser;

use frontend_proxy::config::Cli;
use frontend_proxy::lifecycle;
use frontend_proxy::observability::logging::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    init_logging(&config.observability)?;

    if let Err(e) = lifecycle::run(config).await {
        tracing::error!(error = %e, "frontend-proxy exited with error");
        return Err(e.into());
    }
    Ok(())
}
