//! Command-line flags with environment fallbacks.

use clap::builder::BoolishValueParser;
use clap::Parser;
use std::path::PathBuf;

use crate::build_info;
use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::GatewayConfig;
use crate::config::validation::validate_config;

/// Serve a single-page application out of an object store bucket.
#[derive(Debug, Parser)]
#[command(name = "frontend-proxy", version = build_info::version())]
pub struct Cli {
    /// Optional TOML configuration file.
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, env = "DEBUG", num_args = 0..=1, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub debug: Option<bool>,

    /// Enable human-readable logging.
    #[arg(long, env = "PRETTY", num_args = 0..=1, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub pretty: Option<bool>,

    /// Enable request span events.
    #[arg(long, env = "TRACING", num_args = 0..=1, default_missing_value = "true", value_parser = BoolishValueParser::new())]
    pub tracing: Option<bool>,

    /// The stage this is deployed.
    #[arg(long, env = "STAGE")]
    pub stage: Option<String>,

    /// The branch this is deployed.
    #[arg(long, env = "BRANCH")]
    pub branch: Option<String>,

    /// The application name under which this service is deployed.
    #[arg(long, env = "APP_NAME")]
    pub app_name: Option<String>,

    /// The domain which is served.
    #[arg(long, env = "DOMAIN_NAME")]
    pub domain_name: Option<String>,

    /// The bucket used to serve files, optionally with a prefix ("bucket/prefix").
    #[arg(long, env = "S3_BUCKET")]
    pub s3_bucket: Option<String>,

    /// The bind address.
    #[arg(long, env = "ADDR")]
    pub addr: Option<String>,

    /// Serve the index document for missing non-asset paths.
    #[arg(long, env = "SPA_MODE")]
    pub spa: Option<bool>,

    /// Select a bucket prefix from the request's subdomain.
    #[arg(long, env = "SUBDOMAIN_MODE")]
    pub subdomain_mode: Option<bool>,

    /// Index document name.
    #[arg(long, env = "INDEX_DOCUMENT")]
    pub index_document: Option<String>,

    /// Comma-separated extensions that never fall back to the index document.
    #[arg(long, env = "ASSET_EXTENSIONS", value_delimiter = ',')]
    pub asset_extensions: Option<Vec<String>>,

    /// Header carrying the inbound correlation id.
    #[arg(long, env = "REQUEST_ID_HEADER")]
    pub request_id_header: Option<String>,

    /// Prometheus metrics listener address.
    #[arg(long, env = "METRICS_ADDRESS")]
    pub metrics_address: Option<String>,

    /// Custom S3 endpoint.
    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region.
    #[arg(long, env = "AWS_REGION")]
    pub aws_region: Option<String>,
}

impl Cli {
    /// Load the optional file, apply flag overrides and validate the result.
    pub fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Overlay values given on the command line or environment.
    pub fn apply(self, config: &mut GatewayConfig) {
        let obs = &mut config.observability;
        set(&mut obs.debug, self.debug);
        set(&mut obs.pretty, self.pretty);
        set(&mut obs.tracing, self.tracing);
        set(&mut obs.request_id_header, self.request_id_header);
        if self.metrics_address.is_some() {
            obs.metrics_address = self.metrics_address;
        }

        let deployment = &mut config.deployment;
        set(&mut deployment.stage, self.stage);
        set(&mut deployment.branch, self.branch);
        set(&mut deployment.app_name, self.app_name);

        let site = &mut config.site;
        set(&mut site.domain_name, self.domain_name);
        set(&mut site.bucket, self.s3_bucket);
        set(&mut site.subdomain_mode, self.subdomain_mode);
        set(&mut site.spa.enabled, self.spa);
        set(&mut site.spa.index_document, self.index_document);
        if let Some(extensions) = self.asset_extensions {
            site.spa.asset_extensions = extensions
                .into_iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
        }

        set(&mut config.listener.bind_address, self.addr);

        if self.s3_endpoint.is_some() {
            config.store.endpoint = self.s3_endpoint;
        }
        if self.aws_region.is_some() {
            config.store.region = self.aws_region;
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
