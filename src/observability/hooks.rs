//! Summary and error hooks invoked by the object server.

use serde::Serialize;

use crate::error::GatewayError;
use crate::http::request::RequestContext;

/// Fields describing one successfully served object.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServeSummary {
    pub bucket: String,
    pub key: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub spa_fallback: bool,
    pub attempts: u32,
    pub backend: &'static str,
}

/// Observability interface injected into the object server.
pub trait Observer: Send + Sync {
    /// Called after every successfully served object.
    fn summary(&self, ctx: &RequestContext, summary: &ServeSummary);

    /// Called on every failure path.
    fn on_error(&self, ctx: &RequestContext, error: &GatewayError);
}

/// Default observer writing to the diagnostics log.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    debug: bool,
}

impl TracingObserver {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl Observer for TracingObserver {
    fn summary(&self, ctx: &RequestContext, summary: &ServeSummary) {
        tracing::info!(
            id = ctx.request_id().unwrap_or_default(),
            bucket = %summary.bucket,
            key = %summary.key,
            status = summary.status,
            content_type = summary.content_type.as_deref().unwrap_or_default(),
            content_length = summary.content_length,
            spa_fallback = summary.spa_fallback,
            attempts = summary.attempts,
            backend = summary.backend,
            "processed object request"
        );
    }

    fn on_error(&self, ctx: &RequestContext, error: &GatewayError) {
        let id = ctx.request_id().unwrap_or_default();
        if error.is_store_failure() {
            tracing::error!(id, kind = error.kind(), error = %error, "failed to process object request");
        } else if self.debug || !matches!(error, GatewayError::ObjectNotFound(_)) {
            tracing::warn!(
                id,
                kind = error.kind(),
                error = %error,
                path = %ctx.normalized_path(),
                "failed to process object request"
            );
        }
    }
}
