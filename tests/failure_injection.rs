//! Failure injection tests for store errors, retries and timeouts.

use axum::http::StatusCode;
use frontend_proxy::error::GatewayError;
use frontend_proxy::storage::StorageError;
use futures_util::StreamExt;
use std::sync::atomic::Ordering;
use std::time::Duration;

mod common;

use common::{body_string, test_config, Harness, BUCKET};

#[tokio::test]
async fn test_transient_error_retried_once() {
    let h = Harness::new(test_config());
    h.store.put(BUCKET, "tenant1/app.css", "body{}");
    h.store.fail_next([StorageError::Transient("connection reset".into())]);

    let response = h.get("tenant1.example.com", "/app.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "body{}");

    assert_eq!(h.store.calls(), 2);
    assert_eq!(h.observer.summaries()[0].attempts, 2);
    assert!(h.observer.errors().is_empty());
}

#[tokio::test]
async fn test_repeated_transient_error_is_bad_gateway() {
    let h = Harness::new(test_config());
    h.store.put(BUCKET, "tenant1/app.css", "body{}");
    h.store.fail_next([
        StorageError::Transient("first".into()),
        StorageError::Transient("second".into()),
    ]);

    let response = h.get("tenant1.example.com", "/app.css").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    drop(response);

    assert_eq!(h.store.calls(), 2);
    assert!(matches!(
        h.observer.errors().as_slice(),
        [GatewayError::StoreTransient(msg)] if msg == "second"
    ));
    assert_eq!(h.sink.records()[0].status, 502);
}

#[tokio::test]
async fn test_retry_disabled_fails_fast() {
    let mut config = test_config();
    config.store.retry.enabled = false;
    let h = Harness::new(config);
    h.store.fail_next([StorageError::Transient("reset".into())]);

    let response = h.get("tenant1.example.com", "/app.css").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    drop(response);
    assert_eq!(h.store.calls(), 1);
}

#[tokio::test]
async fn test_fatal_error_not_retried() {
    let h = Harness::new(test_config());
    h.store.fail_next([StorageError::Fatal("access denied".into())]);

    let response = h.get("tenant1.example.com", "/").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    drop(response);

    assert_eq!(h.store.calls(), 1);
    assert!(matches!(
        h.observer.errors().as_slice(),
        [GatewayError::StoreFatal(_)]
    ));
    assert!(h.sink.records()[0].error.contains("access denied"));
}

#[tokio::test]
async fn test_slow_store_times_out() {
    let h = Harness::new(test_config());
    h.store.put(BUCKET, "tenant1/index.html", "late");
    h.store.set_delay(Duration::from_millis(500));

    let response = h.get("tenant1.example.com", "/").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    drop(response);

    // Timeouts are transient: one retry, which times out too.
    assert_eq!(h.store.calls(), 2);
    assert!(matches!(
        h.observer.errors().as_slice(),
        [GatewayError::StoreTimeout(_)]
    ));
}

#[tokio::test]
async fn test_fallback_index_failure_is_reported() {
    let h = Harness::new(test_config());
    h.store.fail_next([
        StorageError::NotFound("tenant1/dashboard/index.html".into()),
        StorageError::Fatal("index denied".into()),
    ]);

    let response = h.get("tenant1.example.com", "/dashboard").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    drop(response);

    assert_eq!(
        h.store.requested_keys(),
        vec!["tenant1/dashboard/index.html", "tenant1/index.html"]
    );
    assert_eq!(h.observer.errors().len(), 1);
}

#[tokio::test]
async fn test_missing_index_is_not_found() {
    let h = Harness::new(test_config());

    let response = h.get("tenant1.example.com", "/dashboard").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    drop(response);

    assert!(matches!(
        h.observer.errors().as_slice(),
        [GatewayError::ObjectNotFound(key)] if key == "tenant1/index.html"
    ));
}

#[tokio::test]
async fn test_client_disconnect_drops_store_body() {
    let h = Harness::new(test_config());
    let dropped = h.store.put_stalling(BUCKET, "tenant1/app.js", "first");

    let response = h.get("tenant1.example.com", "/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    let mut body = response.into_body().into_data_stream();
    let chunk = body.next().await.unwrap().unwrap();
    assert_eq!(&chunk[..], b"first");
    assert!(h.sink.records().is_empty());

    drop(body);

    assert!(dropped.load(Ordering::SeqCst));
    let records = h.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, 200);
    assert_eq!(records[0].bytes_out, 5);
}

#[tokio::test]
async fn test_stalled_body_ends_with_timeout() {
    let h = Harness::new(test_config());
    let dropped = h.store.put_stalling(BUCKET, "tenant1/app.js", "first");

    let response = h.get("tenant1.example.com", "/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    let result = axum::body::to_bytes(response.into_body(), usize::MAX).await;
    assert!(result.is_err());

    assert!(dropped.load(Ordering::SeqCst));
    let records = h.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, 200);
    assert_eq!(records[0].bytes_out, 5);
    assert!(
        records[0].error.contains("store request timed out"),
        "{}",
        records[0].error
    );
}
