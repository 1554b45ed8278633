//! End-to-end tests: record store server and gateway over real sockets.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use mediaseek::api::{build_gateway_router, build_store_router, GatewayState, StoreState};
use mediaseek::config::GatewayConfig;
use mediaseek::search::{DurationStats, SearchConfig};
use mediaseek::store::{GenerateOptions, RecordSource, RemoteStore, ShardedStore, StoreError};
use serde_json::Value;

async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn spawn_stack(store: ShardedStore) -> (Arc<ShardedStore>, SocketAddr, SocketAddr) {
    let store = Arc::new(store);
    let store_addr = spawn_server(build_store_router(StoreState::new(Arc::clone(&store)))).await;

    let remote = RemoteStore::new(format!("http://{}", store_addr), Duration::from_secs(5)).unwrap();
    let source: Arc<dyn RecordSource> = Arc::new(remote);
    let state = GatewayState::new(
        source,
        Arc::new(DurationStats::new()),
        SearchConfig::default(),
        GatewayConfig::default(),
    );
    let gateway_addr = spawn_server(build_gateway_router(state)).await;

    (store, store_addr, gateway_addr)
}

async fn fetch(url: &str) -> (u16, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_sample_dataset_through_gateway() {
    let store = ShardedStore::from_durations(0, &[100, 150, 120, 90, 200], 2).unwrap();
    let (_, _, gateway) = spawn_stack(store).await;

    let (status, body) = fetch(&format!("http://{}/range", gateway)).await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["length"], 5);
    assert_eq!(body["result"]["end"], 660);

    let (status, body) = fetch(&format!("http://{}/media-segment?position=300", gateway)).await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["start"], 250);
    assert_eq!(body["result"]["end"], 370);

    let (status, body) = fetch(&format!("http://{}/media-segment?position=700", gateway)).await;
    assert_eq!(status, 404);
    assert!(body["result"].is_null());

    let (status, body) = fetch(&format!("http://{}/media-segment?position=0", gateway)).await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["index"], 0);

    let (status, body) = fetch(&format!("http://{}/media-segment?position=soon", gateway)).await;
    assert_eq!(status, 404);
    assert!(body["result"].is_null());
}

#[tokio::test]
async fn test_remote_store_client() {
    let store = ShardedStore::from_durations(1000, &[10, 20, 30], 9000).unwrap();
    let (_, store_addr, _) = spawn_stack(store).await;

    let remote = RemoteStore::new(format!("http://{}", store_addr), Duration::from_secs(5)).unwrap();

    let range = remote.range().await.unwrap().unwrap();
    assert_eq!((range.start, range.end, range.length), (1000, 1060, 3));

    let record = remote.get(2).await.unwrap().unwrap();
    assert_eq!((record.start, record.end, record.duration), (1030, 1060, 30));

    assert_eq!(remote.get(3).await.unwrap(), None);
}

#[tokio::test]
async fn test_remote_store_rejects_non_store_server() {
    let router = Router::new().route("/range", axum::routing::get(|| async { "plain text" }));
    let addr = spawn_server(router).await;

    let remote = RemoteStore::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    assert!(matches!(remote.range().await, Err(StoreError::Malformed(_))));
}

#[tokio::test]
async fn test_gateway_with_store_down() {
    let remote = RemoteStore::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    let source: Arc<dyn RecordSource> = Arc::new(remote);
    let state = GatewayState::new(
        source,
        Arc::new(DurationStats::new()),
        SearchConfig::default(),
        GatewayConfig::default(),
    );
    let gateway = spawn_server(build_gateway_router(state)).await;

    let (status, body) = fetch(&format!("http://{}/media-segment?position=10", gateway)).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"]["code"], "UPSTREAM_UNAVAILABLE");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_lookups_through_gateway() {
    let store = ShardedStore::generate(&GenerateOptions {
        record_count: 3000,
        timeline_start: Some(0),
        seed: Some(17),
        latency: Duration::from_millis(2),
        ..Default::default()
    })
    .unwrap();
    let records: Vec<_> = store.records().copied().step_by(97).collect();
    let (store, _, gateway) = spawn_stack(store).await;

    let lookups = records.iter().map(|record| {
        let url = format!(
            "http://{}/media-segment?position={}",
            gateway,
            record.start + record.duration / 2
        );
        async move { fetch(&url).await }
    });
    let results = futures_util::future::join_all(lookups).await;

    for (record, (status, body)) in records.iter().zip(results) {
        assert_eq!(status, 200);
        assert_eq!(body["result"]["index"], record.index);
    }

    let (_, stats) = fetch(&format!("http://{}/stats", gateway)).await;
    assert_eq!(stats["result"]["samples"], store.queries());
    assert_eq!(stats["result"]["known_length"], 3000);
}
