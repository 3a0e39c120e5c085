//! Object fetching and response assembly.

use axum::{
    body::Body,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{SiteConfig, StoreConfig};
use crate::error::GatewayError;
use crate::http::request::RequestContext;
use crate::http::response::object_response;
use crate::observability::metrics;
use crate::observability::{Observer, ServeSummary};
use crate::origin::fallback::SpaPolicy;
use crate::resilience::retries::{fetch_with_retry, FetchOutcome};
use crate::resilience::timeouts::idle_bounded;
use crate::routing::{resolve_target, Namespace};
use crate::storage::{ObjectStore, StorageError, StoredObject};

/// Serves objects for resolved requests. Shared by all requests.
pub struct ObjectServer {
    store: Arc<dyn ObjectStore>,
    spa: SpaPolicy,
    store_config: StoreConfig,
    observer: Arc<dyn Observer>,
}

impl ObjectServer {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        site: &SiteConfig,
        store_config: StoreConfig,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            store,
            spa: SpaPolicy::new(&site.spa),
            store_config,
            observer,
        }
    }

    /// Answer one request whose namespace has already been resolved.
    ///
    /// Exempt requests get a bare 404 without touching the store.
    pub async fn serve(&self, ctx: &RequestContext, method: &Method) -> Response {
        if ctx.is_skipped() {
            return StatusCode::NOT_FOUND.into_response();
        }

        match self.try_serve(ctx, method).await {
            Ok(response) => response,
            Err(err) => {
                self.observer.on_error(ctx, &err);
                err.into_response()
            }
        }
    }

    async fn try_serve(&self, ctx: &RequestContext, method: &Method) -> Result<Response, GatewayError> {
        let namespace = match ctx.namespace() {
            Some(Ok(namespace)) => namespace,
            Some(Err(err)) => return Err(err.clone()),
            None => {
                return Err(GatewayError::DomainMismatch {
                    host: String::new(),
                    domain: String::new(),
                })
            }
        };

        if method != Method::GET && method != Method::HEAD {
            return Err(GatewayError::MethodNotAllowed(method.to_string()));
        }

        let target = resolve_target(namespace, ctx.normalized_path(), self.spa.index_document())?;
        let outcome = self.fetch(&target.bucket, &target.key).await;

        match outcome.result {
            Ok(object) => Ok(self.respond(
                ctx,
                method,
                &target.bucket,
                &target.key,
                object,
                outcome.attempts,
                false,
            )),
            Err(StorageError::NotFound(_)) => {
                let index_key = namespace.key(self.spa.index_document());
                if !self.spa.should_fallback(&target, &index_key) {
                    return Err(GatewayError::ObjectNotFound(target.key));
                }
                self.serve_index(ctx, method, namespace, &index_key, outcome.attempts)
                    .await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn serve_index(
        &self,
        ctx: &RequestContext,
        method: &Method,
        namespace: &Namespace,
        index_key: &str,
        prior_attempts: u32,
    ) -> Result<Response, GatewayError> {
        tracing::debug!(
            namespace = %namespace,
            path = %ctx.normalized_path(),
            "Object missing, serving index document"
        );

        let outcome = self.fetch(namespace.bucket(), index_key).await;
        let object = outcome.result?;
        metrics::record_spa_fallback();
        Ok(self.respond(
            ctx,
            method,
            namespace.bucket(),
            index_key,
            object,
            prior_attempts + outcome.attempts,
            true,
        ))
    }

    async fn fetch(&self, bucket: &str, key: &str) -> FetchOutcome {
        let outcome = fetch_with_retry(self.store.as_ref(), bucket, key, &self.store_config).await;
        metrics::record_store_fetch(match &outcome.result {
            Ok(_) => "found",
            Err(err) => err.outcome(),
        });
        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn respond(
        &self,
        ctx: &RequestContext,
        method: &Method,
        bucket: &str,
        key: &str,
        object: StoredObject,
        attempts: u32,
        spa_fallback: bool,
    ) -> Response {
        let StoredObject { meta, body } = object;
        let idle = Duration::from_millis(self.store_config.chunk_timeout_ms);
        let body = Body::from_stream(idle_bounded(body, idle, key.to_string()));
        let response = object_response(method, StatusCode::OK, key, &meta, body);

        self.observer.summary(
            ctx,
            &ServeSummary {
                bucket: bucket.to_string(),
                key: key.to_string(),
                status: response.status().as_u16(),
                content_type: response
                    .headers()
                    .get(axum::http::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
                content_length: meta.content_length,
                spa_fallback,
                attempts,
                backend: self.store.backend_name(),
            },
        );

        response
    }
}
