#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use std::time::Duration;
use tax_assistant_service::config::{AssistantConfig, GeminiSettings};
use tax_assistant_service::services::providers::mock::MockTextProvider;
use tax_assistant_service::services::TextProvider;
use tax_assistant_service::{build_router, AppState};

pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to process your request. Please try again.";

/// Configuration pointing at nothing real: port 0 and a local API base.
pub fn test_config() -> AssistantConfig {
    AssistantConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        gemini: GeminiSettings {
            api_key: Secret::new("test-api-key".to_string()),
            model: "gemini-test".to_string(),
            api_base: "http://127.0.0.1:1/v1beta".to_string(),
            enable_search: true,
            timeout_secs: 5,
        },
        cors_allowed_origins: Vec::new(),
    }
}

pub fn app_with(config: AssistantConfig, provider: Arc<dyn TextProvider>) -> Router {
    build_router(AppState {
        config,
        text_provider: provider,
    })
}

/// Router backed by `provider`, returned alongside it so tests can inspect calls.
pub fn app_with_mock(provider: MockTextProvider) -> (Router, Arc<MockTextProvider>) {
    let provider = Arc::new(provider);
    (app_with(test_config(), provider.clone()), provider)
}

pub fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn ask_request(prompt: &str) -> Request<Body> {
    json_request(
        Method::POST,
        "/",
        &serde_json::json!({ "prompt": prompt }).to_string(),
    )
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn read_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

pub async fn read_text(response: axum::response::Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).to_string())
}

/// Give a freshly spawned server a moment to start accepting connections.
pub async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let health_url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        if client.get(&health_url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
