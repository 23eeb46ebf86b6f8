//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against the memory backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use kv_recorder::{api::create_router, AppState, PageFetcher, Result};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("<html>{} fetch {}</html>", url, n))
    }
}

async fn create_test_app(page_ttl: u64) -> (Router, Arc<CountingFetcher>) {
    let fetcher = Arc::new(CountingFetcher::default());
    let state = AppState::in_memory(fetcher.clone(), page_ttl).await.unwrap();
    (create_router(state), fetcher)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn store(data: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/store")
        .header("content-type", "application/json")
        .body(Body::from(format!(r#"{{"data":{}}}"#, data)))
        .unwrap()
}

// == Store / Get Endpoint Tests ==

#[tokio::test]
async fn test_store_then_get_str() {
    let (app, _) = create_test_app(10).await;

    let (status, json) = send(&app, store(r#""foo""#)).await;
    assert_eq!(status, StatusCode::OK);
    let key = json["key"].as_str().unwrap().to_string();

    let (status, json) = send(&app, get(&format!("/get/{}?as=str", key))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"].as_str().unwrap(), key);
    assert_eq!(json["value"].as_str().unwrap(), "foo");
}

#[tokio::test]
async fn test_store_then_get_int_and_float() {
    let (app, _) = create_test_app(10).await;

    let (_, json) = send(&app, store("123")).await;
    let int_key = json["key"].as_str().unwrap().to_string();
    let (_, json) = send(&app, store("2.5")).await;
    let float_key = json["key"].as_str().unwrap().to_string();

    let (_, json) = send(&app, get(&format!("/get/{}?as=int", int_key))).await;
    assert_eq!(json["value"].as_i64().unwrap(), 123);

    let (_, json) = send(&app, get(&format!("/get/{}?as=float", float_key))).await;
    assert_eq!(json["value"].as_f64().unwrap(), 2.5);
}

#[tokio::test]
async fn test_store_bytes_read_raw() {
    let (app, _) = create_test_app(10).await;

    let (_, json) = send(&app, store("[0, 128, 255]")).await;
    let key = json["key"].as_str().unwrap().to_string();

    let (status, json) = send(&app, get(&format!("/get/{}", key))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], serde_json::json!([0, 128, 255]));
}

#[tokio::test]
async fn test_get_missing_key() {
    let (app, _) = create_test_app(10).await;

    let (status, json) = send(&app, get("/get/nonexistent")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));

    let (status, json) = send(&app, get("/get/nonexistent?as=int")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn test_get_str_on_binary_is_unprocessable() {
    let (app, _) = create_test_app(10).await;

    let (_, json) = send(&app, store("[255, 254]")).await;
    let key = json["key"].as_str().unwrap().to_string();

    let (status, _) = send(&app, get(&format!("/get/{}?as=str", key))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_store_rejects_unsupported_data() {
    let (app, _) = create_test_app(10).await;

    let (status, json) = send(&app, store("null")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

// == Replay Endpoint Tests ==

#[tokio::test]
async fn test_replay_after_stores() {
    let (app, _) = create_test_app(10).await;

    let (_, json) = send(&app, store(r#""foo""#)).await;
    let k1 = json["key"].as_str().unwrap().to_string();
    let (_, json) = send(&app, store("123")).await;
    let k2 = json["key"].as_str().unwrap().to_string();

    let (status, json) = send(&app, get("/replay/Cache.store")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["operation"].as_str().unwrap(), "Cache.store");
    assert_eq!(json["calls"].as_i64().unwrap(), 2);

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["input"].as_str().unwrap(), "('foo',)");
    assert_eq!(entries[0]["output"].as_str().unwrap(), k1);
    assert_eq!(entries[1]["input"].as_str().unwrap(), "(123,)");
    assert_eq!(entries[1]["output"].as_str().unwrap(), k2);
}

#[tokio::test]
async fn test_replay_unknown_operation_is_empty() {
    let (app, _) = create_test_app(10).await;

    let (status, json) = send(&app, get("/replay/Cache.nothing")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["calls"].as_i64().unwrap(), 0);
    assert!(json["entries"].as_array().unwrap().is_empty());
}

// == Page Endpoint Tests ==

#[tokio::test]
async fn test_page_cached_within_ttl() {
    let (app, fetcher) = create_test_app(10).await;

    let (status, first) = send(&app, get("/page?url=http://example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["cached"], Value::Bool(false));
    assert_eq!(first["access_count"].as_i64().unwrap(), 1);

    let (_, second) = send(&app, get("/page?url=http://example.com")).await;
    assert_eq!(second["cached"], Value::Bool(true));
    assert_eq!(second["body"], first["body"]);
    assert_eq!(second["access_count"].as_i64().unwrap(), 2);

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_page_refetched_after_ttl() {
    let (app, fetcher) = create_test_app(1).await;

    let (_, first) = send(&app, get("/page?url=http://example.com")).await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let (_, second) = send(&app, get("/page?url=http://example.com")).await;

    assert_eq!(second["cached"], Value::Bool(false));
    assert_ne!(second["body"], first["body"]);
    assert_eq!(second["access_count"].as_i64().unwrap(), 2);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_page_empty_url_rejected() {
    let (app, fetcher) = create_test_app(10).await;

    let (status, _) = send(&app, get("/page?url=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

// == Stats / Health Endpoint Tests ==

#[tokio::test]
async fn test_stats_reflect_page_traffic() {
    let (app, _) = create_test_app(10).await;

    send(&app, get("/page?url=http://a.test")).await;
    send(&app, get("/page?url=http://a.test")).await;
    send(&app, get("/page?url=http://a.test")).await;
    send(&app, get("/page?url=http://b.test")).await;

    let (status, json) = send(&app, get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"].as_u64().unwrap(), 2);
    assert_eq!(json["misses"].as_u64().unwrap(), 2);
    assert_eq!(json["hit_rate"].as_f64().unwrap(), 0.5);
    assert_eq!(json["fetch_errors"].as_u64().unwrap(), 0);
    assert_eq!(json["page_ttl"].as_u64().unwrap(), 10);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app(10).await;

    let (status, json) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}
