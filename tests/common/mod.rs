#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use papi_ghl_backend::{
    build_router,
    config::AppConfig,
    state::AppState,
    store::{ConfigStore, InMemoryConfigStore},
};

/// Router over a fresh in-memory store, simulated collaborators.
pub fn test_app() -> (Router, AppState) {
    test_app_with(AppConfig::default())
}

pub fn test_app_with(config: AppConfig) -> (Router, AppState) {
    let store: Arc<dyn ConfigStore> = Arc::new(InMemoryConfigStore::new());
    let state = AppState::with_store(config, store).unwrap();
    (build_router(state.clone()), state)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Host", "papi.test")
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    post_raw(uri, &body.to_string())
}

pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
    post_bytes(uri, body.as_bytes().to_vec())
}

pub fn post_bytes(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Host", "papi.test")
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value = serde_json::from_str(&body)
        .unwrap_or_else(|e| panic!("response was not JSON ({}): {}", e, body));
    (status, value)
}
