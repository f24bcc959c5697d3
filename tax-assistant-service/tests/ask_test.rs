mod common;

use axum::http::{Method, StatusCode};
use common::{
    app_with, app_with_mock, ask_request, empty_request, json_request, read_json, test_config,
    UPSTREAM_FAILURE_MESSAGE,
};
use serde_json::json;
use std::sync::Arc;
use tax_assistant_service::models::SYSTEM_INSTRUCTION;
use tax_assistant_service::services::providers::mock::{MockBehavior, MockTextProvider};
use tax_assistant_service::services::{GenerationParams, ProviderError};
use tower::ServiceExt;

#[tokio::test]
async fn answers_prompt_with_provider_text() {
    let (app, provider) = app_with_mock(MockTextProvider::replying("The CBS rate is X%."));

    let response = app
        .oneshot(ask_request("What is the CBS tax rate?"))
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "The CBS rate is X%." }));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn get_root_is_method_not_allowed() {
    let (app, provider) = app_with_mock(MockTextProvider::replying("unused"));

    let response = app.oneshot(empty_request(Method::GET, "/")).await.unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "error": "Method not allowed" }));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn every_non_post_method_is_rejected_without_provider_call() {
    let (app, provider) = app_with_mock(MockTextProvider::replying("unused"));

    for method in [
        Method::GET,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
        Method::HEAD,
    ] {
        for uri in ["/", "/api/ask-gemini"] {
            let response = app
                .clone()
                .oneshot(json_request(
                    method.clone(),
                    uri,
                    r#"{"prompt":"What is the CBS tax rate?"}"#,
                ))
                .await
                .unwrap();

            assert_eq!(
                response.status(),
                StatusCode::METHOD_NOT_ALLOWED,
                "{} {}",
                method,
                uri
            );
        }
    }

    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn missing_prompt_is_bad_request() {
    let (app, provider) = app_with_mock(MockTextProvider::replying("unused"));

    let response = app
        .oneshot(json_request(Method::POST, "/", "{}"))
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "prompt is required" }));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn unusable_bodies_are_bad_request_without_provider_call() {
    let (app, provider) = app_with_mock(MockTextProvider::replying("unused"));

    let bodies = [
        r#"{"prompt":""}"#,
        r#"{"prompt":null}"#,
        r#"{"prompt":42}"#,
        r#"{"question":"What is the CBS tax rate?"}"#,
        "not json",
        "",
    ];

    for body in bodies {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/", body))
            .await
            .unwrap();

        let (status, json_body) = read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {:?}", body);
        assert_eq!(json_body, json!({ "error": "prompt is required" }));
    }

    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn body_without_json_content_type_is_bad_request() {
    let (app, provider) = app_with_mock(MockTextProvider::replying("unused"));

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/")
        .body(axum::body::Body::from(r#"{"prompt":"hello"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn network_failure_returns_generic_error() {
    let (app, provider) = app_with_mock(MockTextProvider::failing(
        ProviderError::NetworkError("connection reset by peer".to_string()),
    ));

    let response = app.oneshot(ask_request("...")).await.unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": UPSTREAM_FAILURE_MESSAGE }));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn every_provider_failure_collapses_to_the_same_response() {
    let failures = [
        ProviderError::NotConfigured("Gemini API key not configured".to_string()),
        ProviderError::NetworkError("dns failure".to_string()),
        ProviderError::Timeout,
        ProviderError::ApiError {
            status: 403,
            message: "PERMISSION_DENIED: API key not valid".to_string(),
        },
        ProviderError::RateLimited,
        ProviderError::ContentFiltered,
        ProviderError::InvalidResponse("Response contained no text".to_string()),
    ];

    for failure in failures {
        let (app, _) = app_with_mock(MockTextProvider::failing(failure.clone()));

        let response = app
            .oneshot(ask_request("What is the CBS tax rate?"))
            .await
            .unwrap();

        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{:?}", failure);
        assert_eq!(body, json!({ "error": UPSTREAM_FAILURE_MESSAGE }));
    }
}

#[tokio::test]
async fn repeated_prompt_yields_identical_responses() {
    let (app, provider) = app_with_mock(MockTextProvider::replying("The CBS rate is X%."));

    let mut responses = Vec::new();
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(ask_request("What is the CBS tax rate?"))
            .await
            .unwrap();
        responses.push(read_json(response).await);
    }

    assert!(responses.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(responses[0].0, StatusCode::OK);
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn provider_receives_fresh_conversation_and_search_flag() {
    let (app, provider) = app_with_mock(MockTextProvider::new(MockBehavior::Echo));

    let response = app
        .oneshot(ask_request("  Quando a CBS entra em vigor?\n"))
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "  Quando a CBS entra em vigor?\n" }));

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].system_instruction, SYSTEM_INSTRUCTION);
    assert_eq!(calls[0].message, "  Quando a CBS entra em vigor?\n");
    assert_eq!(
        calls[0].params,
        GenerationParams {
            enable_search: true
        }
    );
}

#[tokio::test]
async fn whitespace_only_prompt_is_forwarded_unchanged() {
    let (app, provider) = app_with_mock(MockTextProvider::new(MockBehavior::Echo));

    let response = app.oneshot(ask_request("   ")).await.unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "   " }));
    assert_eq!(provider.calls()[0].message, "   ");
}

#[tokio::test]
async fn search_flag_follows_configuration() {
    let provider = Arc::new(MockTextProvider::replying("ok"));
    let mut config = test_config();
    config.gemini.enable_search = false;
    let app = app_with(config, provider.clone());

    let response = app.oneshot(ask_request("hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!provider.calls()[0].params.enable_search);
}

#[tokio::test]
async fn serverless_path_serves_the_same_endpoint() {
    let (app, _) = app_with_mock(MockTextProvider::replying("The CBS rate is X%."));

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/ask-gemini",
            r#"{"prompt":"What is the CBS tax rate?"}"#,
        ))
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "The CBS rate is X%." }));
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let (app, provider) = app_with_mock(MockTextProvider::new(MockBehavior::Echo));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let response = app.oneshot(ask_request(&format!("prompt {}", i))).await.unwrap();
                (i, read_json(response).await)
            })
        })
        .collect();

    for handle in handles {
        let (i, (status, body)) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "text": format!("prompt {}", i) }));
    }

    assert!(provider
        .calls()
        .iter()
        .all(|call| call.system_instruction == SYSTEM_INSTRUCTION));
    assert_eq!(provider.call_count(), 8);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (app, _) = app_with_mock(MockTextProvider::replying("unused"));

    let response = app
        .oneshot(empty_request(Method::GET, "/nope"))
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let (app, _) = app_with_mock(MockTextProvider::replying("ok"));

    let mut request = ask_request("hello");
    request
        .headers_mut()
        .insert("x-request-id", "req-42".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["cache-control"], "no-store");
}

#[tokio::test]
async fn oversized_body_is_rejected_without_provider_call() {
    let (app, provider) = app_with_mock(MockTextProvider::replying("unused"));

    let prompt = "a".repeat(128 * 1024);
    let response = app.oneshot(ask_request(&prompt)).await.unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn cors_preflight_is_answered_when_origins_configured() {
    let provider = Arc::new(MockTextProvider::replying("ok"));
    let mut config = test_config();
    config.cors_allowed_origins = vec!["https://app.example".to_string()];
    let app = app_with(config, provider.clone());

    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/")
        .header("origin", "https://app.example")
        .header("access-control-request-method", "POST")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://app.example"
    );

    let mut request = ask_request("hello");
    request
        .headers_mut()
        .insert("origin", "https://app.example".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://app.example"
    );
    assert_eq!(provider.call_count(), 1);
}
