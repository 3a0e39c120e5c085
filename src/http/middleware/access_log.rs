//! Access logging stage.
//!
//! # Responsibilities
//! - Establish the correlation id (inbound header or a generated UUID v4)
//! - Time the request and count response bytes as the body streams out
//! - Emit exactly one record when the response body is dropped
//!
//! # Design Decisions
//! - The record is owned by the response body, so a client disconnect
//!   mid-stream still produces a record with the bytes actually sent
//! - Exempt paths never construct a record

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use http_body::{Frame, SizeHint};
use pin_project_lite::pin_project;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tracing::Instrument;

use crate::error::GatewayError;
use crate::http::request::{client_ip, ensure_request_id, request_host, take_context};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::observability::tracing::request_span;
use crate::observability::{AccessLogRecord, AccessLogSink};

pub async fn log_access(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let mut ctx = take_context(&mut req);
    if ctx.is_skipped() {
        req.extensions_mut().insert(ctx);
        return next.run(req).await;
    }

    let start = Instant::now();
    let header_name = state.request_id_header.clone();
    let id = ensure_request_id(req.headers_mut(), &header_name);
    ctx.set_request_id(id.clone());

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let headers = req.headers();
    let record = AccessLogRecord {
        time: String::new(),
        id: id.clone(),
        remote_ip: client_ip(headers, peer),
        host: request_host(&req).unwrap_or_default(),
        method: req.method().to_string(),
        uri: ctx.original_uri().to_string(),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
        status: 0,
        error: String::new(),
        latency: 0,
        latency_human: String::new(),
        bytes_in: headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        bytes_out: 0,
    };

    let span = request_span(&id, &record.method, &record.uri);
    req.extensions_mut().insert(ctx);
    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(header_name, value);
    }

    let mut pending = PendingRecord::new(record, start, Arc::clone(&state.access_log));
    pending.record.status = response.status().as_u16();
    if let Some(err) = response.extensions().get::<GatewayError>() {
        pending.record.error = err.to_string();
    }

    response.map(|body| Body::new(CountingBody::new(body, pending)))
}

/// A record waiting for its response body to finish.
///
/// Emitted to the sink on drop, which happens exactly once.
pub struct PendingRecord {
    record: AccessLogRecord,
    start: Instant,
    sink: Arc<dyn AccessLogSink>,
}

impl PendingRecord {
    pub fn new(record: AccessLogRecord, start: Instant, sink: Arc<dyn AccessLogSink>) -> Self {
        Self {
            record,
            start,
            sink,
        }
    }
}

impl Drop for PendingRecord {
    fn drop(&mut self) {
        let latency = self.start.elapsed();
        self.record.time = AccessLogRecord::timestamp();
        self.record.set_latency(latency);
        metrics::record_request(&self.record.method, self.record.status, latency);
        self.sink.emit(&self.record);
    }
}

pin_project! {
    /// Response body wrapper counting the bytes handed to the connection.
    pub struct CountingBody<B> {
        #[pin]
        inner: B,
        pending: PendingRecord,
    }
}

impl<B> CountingBody<B> {
    pub fn new(inner: B, pending: PendingRecord) -> Self {
        Self { inner, pending }
    }
}

impl<B> http_body::Body for CountingBody<B>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.project();
        let polled = this.inner.poll_frame(cx);

        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    this.pending.record.bytes_out += data.len() as u64;
                }
            }
            Poll::Ready(Some(Err(err))) => {
                if this.pending.record.error.is_empty() {
                    this.pending.record.error = err.to_string();
                }
            }
            _ => {}
        }

        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
