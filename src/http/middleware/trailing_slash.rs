//! Trailing-slash normalization.
//!
//! Every non-exempt path is rewritten in place to end in exactly one '/'
//! before routing. No redirect is issued; the query string is kept and the
//! original URI is recorded in the request context for the access log.

use axum::body::Body;
use axum::http::uri::PathAndQuery;
use axum::http::{Request, Uri};

use crate::http::middleware::skip::is_exempt;
use crate::http::request::RequestContext;

/// Canonical form of `path`: trailing slashes collapsed to a single one.
pub fn canonical_path(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}

/// Rewrite the request path and attach a fresh [`RequestContext`].
pub fn normalize_request(mut req: Request<Body>) -> Request<Body> {
    let original = req.uri().clone();
    let path = original.path();
    let skipped = is_exempt(path);
    let normalized = if skipped {
        path.to_string()
    } else {
        canonical_path(path)
    };

    if normalized != path {
        if let Some(uri) = rewrite_path(&original, &normalized) {
            *req.uri_mut() = uri;
        }
    }

    req.extensions_mut()
        .insert(RequestContext::new(&original, normalized, skipped));
    req
}

fn rewrite_path(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}
