//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the shared state (resolver, object server, access log sink)
//! - Assemble the pipeline: normalizer, access logger, limits, resolver, handlers
//! - Bind the service to a listener with graceful shutdown

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    middleware::from_fn_with_state,
    response::Response,
    routing::get,
    Router, ServiceExt,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::util::MapRequest;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::config::GatewayConfig;
use crate::health::liveness;
use crate::http::middleware::{log_access, normalize_request, resolve_domain};
use crate::http::request::{request_host, take_context};
use crate::observability::{AccessLogSink, Observer, StdoutSink, TracingObserver};
use crate::origin::ObjectServer;
use crate::routing::DomainResolver;
use crate::storage::ObjectStore;

/// Request rewrite applied before routing.
pub type Normalizer = fn(Request<Body>) -> Request<Body>;

/// The complete request pipeline as a single service.
pub type GatewayService = MapRequest<Router, Normalizer>;

const DEFAULT_REQUEST_ID_HEADER: &str = "x-amzn-trace-id";

/// Application state injected into middleware and handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<DomainResolver>,
    pub origin: Arc<ObjectServer>,
    pub access_log: Arc<dyn AccessLogSink>,
    pub request_id_header: HeaderName,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    service: GatewayService,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server writing access records to stdout and diagnostics via tracing.
    pub fn new(config: GatewayConfig, store: Arc<dyn ObjectStore>) -> Self {
        let observer = Arc::new(TracingObserver::new(config.observability.debug));
        Self::with_hooks(config, store, observer, Arc::new(StdoutSink))
    }

    /// Create a server with explicit observer and access log sink.
    pub fn with_hooks(
        config: GatewayConfig,
        store: Arc<dyn ObjectStore>,
        observer: Arc<dyn Observer>,
        access_log: Arc<dyn AccessLogSink>,
    ) -> Self {
        let request_id_header =
            HeaderName::from_bytes(config.observability.request_id_header.as_bytes())
                .unwrap_or_else(|_| HeaderName::from_static(DEFAULT_REQUEST_ID_HEADER));

        let state = AppState {
            resolver: Arc::new(DomainResolver::new(&config.site)),
            origin: Arc::new(ObjectServer::new(
                store,
                &config.site,
                config.store.clone(),
                observer,
            )),
            access_log,
            request_id_header,
        };

        let router = Self::build_router(&config, state);
        let service = MapRequest::new(router, normalize_request as Normalizer);
        Self { service, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost-last: access log, body limit, timeout, resolver.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(liveness))
            .fallback(serve_object)
            .layer(from_fn_with_state(state.clone(), resolve_domain))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(from_fn_with_state(state.clone(), log_access))
            .with_state(state)
    }

    /// The pipeline as a tower service, for driving requests without a socket.
    pub fn service(&self) -> GatewayService {
        self.service.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            domain = %self.config.site.domain_name,
            bucket = %self.config.site.bucket,
            spa = self.config.site.spa.enabled,
            "HTTP server starting"
        );

        let app = self
            .service
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Fallback handler: every non-liveness path is an object request.
async fn serve_object(State(state): State<AppState>, mut request: Request<Body>) -> Response {
    let mut ctx = take_context(&mut request);
    if !ctx.is_skipped() && ctx.namespace().is_none() {
        let host = request_host(&request);
        ctx.set_namespace(state.resolver.resolve(host.as_deref()));
    }
    state.origin.serve(&ctx, request.method()).await
}
