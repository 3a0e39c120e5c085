//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use bytes::Bytes;
use futures_util::StreamExt;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

use frontend_proxy::config::GatewayConfig;
use frontend_proxy::error::GatewayError;
use frontend_proxy::http::{HttpServer, RequestContext};
use frontend_proxy::lifecycle::Shutdown;
use frontend_proxy::observability::{AccessLogRecord, AccessLogSink, Observer, ServeSummary};
use frontend_proxy::storage::{
    ObjectMeta, ObjectResult, ObjectStore, StorageError, StoredObject,
};

/// In-memory object store with scripted failures and an optional delay.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), (ObjectMeta, Bytes)>>,
    stalling: Mutex<HashMap<(String, String), (Bytes, Arc<AtomicBool>)>>,
    failures: Mutex<VecDeque<StorageError>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicU32,
    keys: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put(&self, bucket: &str, key: &str, body: &str) {
        self.put_with_meta(bucket, key, body, ObjectMeta::default());
    }

    pub fn put_with_meta(&self, bucket: &str, key: &str, body: &str, mut meta: ObjectMeta) {
        meta.content_length = Some(body.len() as u64);
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (meta, Bytes::from(body.to_string())),
        );
    }

    /// Serve `first` as one chunk, then never send more data.
    ///
    /// The returned flag is set once the body stream is dropped.
    pub fn put_stalling(&self, bucket: &str, key: &str, first: &str) -> Arc<AtomicBool> {
        let dropped = Arc::new(AtomicBool::new(false));
        self.stalling.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (Bytes::from(first.to_string()), dropped.clone()),
        );
        dropped
    }

    /// Fail the next calls with these errors, in order.
    pub fn fail_next(&self, errors: impl IntoIterator<Item = StorageError>) {
        self.failures.lock().unwrap().extend(errors);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Keys requested so far, in order.
    pub fn requested_keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> ObjectResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys.lock().unwrap().push(key.to_string());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().unwrap().pop_front();
        if let Some(err) = failure {
            return Err(err);
        }

        let stalling = self
            .stalling
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned();
        if let Some((first, dropped)) = stalling {
            let guard = DropFlag(dropped);
            let body = futures_util::stream::once(async move { Ok::<_, StorageError>(first) })
                .chain(futures_util::stream::pending())
                .map(move |chunk| {
                    let _ = &guard;
                    chunk
                });
            return Ok(StoredObject {
                meta: ObjectMeta::default(),
                body: Box::pin(body),
            });
        }

        let found = self
            .objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned();
        match found {
            Some((meta, data)) => Ok(StoredObject::from_bytes(meta, data)),
            None => Err(StorageError::NotFound(key.to_string())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Sets its flag when dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Access log sink keeping every record.
#[derive(Default)]
pub struct CaptureSink {
    records: Mutex<Vec<AccessLogRecord>>,
}

impl CaptureSink {
    pub fn records(&self) -> Vec<AccessLogRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl AccessLogSink for CaptureSink {
    fn emit(&self, record: &AccessLogRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

/// Observer keeping every summary and error.
#[derive(Default)]
pub struct RecordingObserver {
    pub summaries: Mutex<Vec<ServeSummary>>,
    pub errors: Mutex<Vec<GatewayError>>,
}

impl RecordingObserver {
    pub fn summaries(&self) -> Vec<ServeSummary> {
        self.summaries.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<GatewayError> {
        self.errors.lock().unwrap().clone()
    }
}

impl Observer for RecordingObserver {
    fn summary(&self, _ctx: &RequestContext, summary: &ServeSummary) {
        self.summaries.lock().unwrap().push(summary.clone());
    }

    fn on_error(&self, _ctx: &RequestContext, error: &GatewayError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}

pub const BUCKET: &str = "site-assets";
pub const DOMAIN: &str = "example.com";

/// Config for `example.com` backed by `site-assets`, with fast retries.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.site.domain_name = DOMAIN.into();
    config.site.bucket = BUCKET.into();
    config.store.retry.base_delay_ms = 5;
    config.store.retry.max_delay_ms = 10;
    config.store.fetch_timeout_ms = 200;
    config.store.chunk_timeout_ms = 200;
    config
}

/// A gateway wired to test doubles.
pub struct Harness {
    pub server: HttpServer,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<CaptureSink>,
    pub observer: Arc<RecordingObserver>,
}

impl Harness {
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_store(config, MemoryStore::new())
    }

    pub fn with_store(config: GatewayConfig, store: Arc<MemoryStore>) -> Self {
        let sink = Arc::new(CaptureSink::default());
        let observer = Arc::new(RecordingObserver::default());
        let server = HttpServer::with_hooks(config, store.clone(), observer.clone(), sink.clone());
        Self {
            server,
            store,
            sink,
            observer,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.server.service().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, host: &str, path: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .uri(path)
                .header("host", host)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Serve `server` on an ephemeral port; returns its address and the shutdown handle.
pub async fn spawn_server(server: HttpServer) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}
