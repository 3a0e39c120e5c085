//! Request spans.
//!
//! Every non-exempt request runs inside a `request` span so diagnostics emitted
//! by downstream stages carry the correlation id. With the tracing flag set the
//! span's close event (with timing) is logged as well.

use tracing::Span;

pub fn request_span(id: &str, method: &str, uri: &str) -> Span {
    tracing::info_span!("request", id = %id, method = %method, uri = %uri)
}
