//! Namespace resolution stage.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::{request_host, take_context};
use crate::http::server::AppState;

/// Resolve the host into a namespace and record the outcome in the context.
///
/// Failures are not answered here; the object server turns them into a 404
/// so every non-exempt request still flows through one serving path.
pub async fn resolve_domain(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let mut ctx = take_context(&mut req);

    if !ctx.is_skipped() {
        let host = request_host(&req);
        let resolved = state.resolver.resolve(host.as_deref());
        if let Err(err) = &resolved {
            tracing::debug!(host = ?host, error = %err, "Host did not resolve to a namespace");
        }
        ctx.set_namespace(resolved);
    }

    req.extensions_mut().insert(ctx);
    next.run(req).await
}
