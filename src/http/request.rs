//! Per-request context and header helpers.
//!
//! # Responsibilities
//! - Carry the request id, original URI and normalized path between stages
//! - Hold the resolved namespace, set at most once per request
//! - Extract the correlation id, client address and host
//!
//! # Design Decisions
//! - The context lives in request extensions; stages take it out, update it
//!   and put it back, so a missing context is rebuilt rather than a panic
//! - The original URI is kept for logging; the path is rewritten in place

use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, Uri};
use std::net::SocketAddr;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::routing::Namespace;

/// State shared by the pipeline stages for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    request_id: Option<String>,
    original_uri: String,
    normalized_path: String,
    skipped: bool,
    namespace: Option<Result<Namespace, GatewayError>>,
}

impl RequestContext {
    pub fn new(original_uri: &Uri, normalized_path: impl Into<String>, skipped: bool) -> Self {
        Self {
            request_id: None,
            original_uri: original_uri.to_string(),
            normalized_path: normalized_path.into(),
            skipped,
            namespace: None,
        }
    }

    /// Build a context for a request that never went through normalization.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let path = req.uri().path();
        Self::new(req.uri(), path, crate::http::middleware::is_exempt(path))
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Set the correlation id. Returns false if one was already set.
    pub fn set_request_id(&mut self, id: impl Into<String>) -> bool {
        if self.request_id.is_some() {
            return false;
        }
        self.request_id = Some(id.into());
        true
    }

    pub fn original_uri(&self) -> &str {
        &self.original_uri
    }

    pub fn normalized_path(&self) -> &str {
        &self.normalized_path
    }

    /// Whether the request bypasses logging and resolution.
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn namespace(&self) -> Option<&Result<Namespace, GatewayError>> {
        self.namespace.as_ref()
    }

    /// Record the resolution outcome. Returns false if already resolved.
    pub fn set_namespace(&mut self, resolved: Result<Namespace, GatewayError>) -> bool {
        if self.namespace.is_some() {
            return false;
        }
        self.namespace = Some(resolved);
        true
    }
}

/// Remove the context from `req`, building one if the request has none.
pub fn take_context<B>(req: &mut Request<B>) -> RequestContext {
    match req.extensions_mut().remove::<RequestContext>() {
        Some(ctx) => ctx,
        None => RequestContext::from_request(req),
    }
}

/// Return the inbound correlation id, generating and inserting one if absent.
pub fn ensure_request_id(headers: &mut HeaderMap, name: &HeaderName) -> String {
    if let Some(existing) = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return existing.to_string();
    }

    let id = Uuid::new_v4().to_string();
    if let Ok(value) = HeaderValue::from_str(&id) {
        headers.insert(name.clone(), value);
    }
    id
}

/// Client address: first X-Forwarded-For entry, then X-Real-IP, then the peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    match forwarded.or_else(real_ip) {
        Some(ip) => ip.to_string(),
        None => peer.map(|addr| addr.ip().to_string()).unwrap_or_default(),
    }
}

/// Host header, falling back to the URI authority.
pub fn request_host<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.to_string()))
}
