//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against the memory
//! store and a stub page fetcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use instrumented_cache::{
    api::create_router,
    cache::{fetch_fn, Cache, ExpiringCache},
    error::CacheError,
    store::{MemoryStore, SharedStore},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

/// Builds an app whose page fetcher echoes the URL and counts its calls.
fn create_test_app() -> (Router, Arc<AtomicUsize>) {
    let store: SharedStore = Arc::new(MemoryStore::new());

    let fetches = Arc::new(AtomicUsize::new(0));
    let counter = fetches.clone();
    let fetcher = fetch_fn(move |url: String| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            if url.contains("broken") {
                Err(CacheError::Fetch(format!("connection refused: {}", url)))
            } else {
                Ok(format!("<html>{}</html>", url))
            }
        }
    });

    let pages = ExpiringCache::configure(store.clone(), 10, fetcher).unwrap();
    let app = create_router(AppState::new(Cache::new(store), pages));
    (app, fetches)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn store_value(app: &Router, body: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/store")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    json["key"].as_str().unwrap().to_string()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

// == STORE / GET Endpoint Tests ==

#[tokio::test]
async fn test_store_and_get_text() {
    let (app, _) = create_test_app();

    let key = store_value(&app, r#"{"value":"hello"}"#).await;

    let response = get(&app, &format!("/get/{}", key)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"].as_str().unwrap(), key);
    assert_eq!(json["value"].as_str().unwrap(), "hello");
}

#[tokio::test]
async fn test_store_and_get_int() {
    let (app, _) = create_test_app();

    let key = store_value(&app, r#"{"value":42}"#).await;

    let response = get(&app, &format!("/get/{}?as=int", key)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"].as_i64().unwrap(), 42);
}

#[tokio::test]
async fn test_get_int_on_text_is_unprocessable() {
    let (app, _) = create_test_app();

    let key = store_value(&app, r#"{"value":"abc"}"#).await;

    let response = get(&app, &format!("/get/{}?as=int", key)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Conversion"));
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let (app, _) = create_test_app();

    let response = get(&app, "/get/nonexistent_key").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_rejects_unsupported_value() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/store")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"value":[1,2,3]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == REPLAY Endpoint Tests ==

#[tokio::test]
async fn test_replay_after_three_stores() {
    let (app, _) = create_test_app();

    let k1 = store_value(&app, r#"{"value":"foo"}"#).await;
    let k2 = store_value(&app, r#"{"value":"bar"}"#).await;
    let k3 = store_value(&app, r#"{"value":42}"#).await;

    let response = get(&app, "/replay").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["identity"].as_str().unwrap(), "Cache.store");
    assert_eq!(json["call_count"].as_u64().unwrap(), 3);

    let calls = json["calls"].as_array().unwrap();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0]["input"].as_str().unwrap(), "(\"foo\",)");
    assert_eq!(calls[0]["output"].as_str().unwrap(), k1);
    assert_eq!(calls[1]["input"].as_str().unwrap(), "(\"bar\",)");
    assert_eq!(calls[1]["output"].as_str().unwrap(), k2);
    assert_eq!(calls[2]["input"].as_str().unwrap(), "(42,)");
    assert_eq!(calls[2]["output"].as_str().unwrap(), k3);

    let trace = json["trace"].as_str().unwrap();
    assert!(trace.starts_with("Cache.store was called 3 times:"));
    assert_eq!(trace.lines().count(), 4);
}

// == PAGE Endpoint Tests ==

#[tokio::test]
async fn test_page_is_cached_and_counted() {
    let (app, fetches) = create_test_app();
    let uri = "/page?url=http://example.com";

    for _ in 0..3 {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_to_string(response.into_body()).await,
            "<html>http://example.com</html>"
        );
    }
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    let response = get(&app, "/page/count?url=http://example.com").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["url"].as_str().unwrap(), "http://example.com");
    assert_eq!(json["count"].as_i64().unwrap(), 3);
}

#[tokio::test]
async fn test_page_fetch_failure_is_bad_gateway() {
    let (app, fetches) = create_test_app();

    let response = get(&app, "/page?url=http://broken.example").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // Failures are not cached
    let response = get(&app, "/page?url=http://broken.example").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    let response = get(&app, "/page/count?url=http://broken.example").await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"].as_i64().unwrap(), 2);
}

#[tokio::test]
async fn test_page_count_for_unknown_url_is_zero() {
    let (app, _) = create_test_app();

    let response = get(&app, "/page/count?url=http://never.example").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"].as_i64().unwrap(), 0);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}
