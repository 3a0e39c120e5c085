//! Concurrent requests against a gateway bound to a real socket.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use frontend_proxy::http::HttpServer;

mod common;

use common::{test_config, CaptureSink, MemoryStore, RecordingObserver, BUCKET};
use std::sync::Arc;

#[tokio::test]
async fn test_concurrent_requests_get_distinct_records() {
    let store = MemoryStore::new();
    store.put(BUCKET, "tenant1/index.html", "<html>tenant1</html>");
    store.put(BUCKET, "tenant2/index.html", "<html>tenant2</html>");
    store.set_delay(Duration::from_millis(5));

    let sink = Arc::new(CaptureSink::default());
    let server = HttpServer::with_hooks(
        test_config(),
        store.clone(),
        Arc::new(RecordingObserver::default()),
        sink.clone(),
    );
    let (addr, shutdown) = common::spawn_server(server).await;

    let concurrency: usize = 10;
    let requests_per_task = 20;
    let client = reqwest::Client::new();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let tenant = if task % 2 == 0 { "tenant1" } else { "tenant2" };
        let url = format!("http://{addr}/page-{task}");
        tasks.push(tokio::spawn(async move {
            let mut ok = 0usize;
            for _ in 0..requests_per_task {
                let res = client
                    .get(&url)
                    .header("host", format!("{tenant}.example.com"))
                    .send()
                    .await
                    .unwrap();
                assert!(res.status().is_success());
                let body = res.text().await.unwrap();
                assert_eq!(body, format!("<html>{tenant}</html>"));
                ok += 1;
            }
            ok
        }));
    }

    let mut total = 0;
    for task in tasks {
        total += task.await.unwrap();
    }
    let elapsed = start.elapsed();
    println!("{total} requests in {elapsed:?}");
    assert_eq!(total, concurrency * requests_per_task);

    // Records are emitted when response bodies are dropped on the server side.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let records = sink.records();
    assert_eq!(records.len(), total);

    let ids: HashSet<_> = records.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids.len(), total, "correlation ids must be unique");
    for record in &records {
        assert_eq!(record.status, 200);
        assert_eq!(record.remote_ip, "127.0.0.1");
        assert!(record.latency >= Duration::from_millis(5).as_nanos() as u64);
        assert_eq!(record.bytes_out, 20);
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_healthz_over_tcp() {
    let server = HttpServer::with_hooks(
        test_config(),
        MemoryStore::new(),
        Arc::new(RecordingObserver::default()),
        Arc::new(CaptureSink::default()),
    );
    let (addr, shutdown) = common::spawn_server(server).await;

    let body: serde_json::Value = reqwest::get(format!("http://{addr}/healthz"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["msg"], "ok");

    shutdown.trigger();
}
