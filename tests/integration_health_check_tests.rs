use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use nusa_ocr::{
    build_router,
    ocr::error::OcrError,
    test_helpers::{create_test_app_state, ScriptedCompletionClient, StubOcrEngine},
};

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn healthy_app() -> axum::Router {
    build_router(create_test_app_state(
        Arc::new(StubOcrEngine::with_lines(&["ok"])),
        Arc::new(ScriptedCompletionClient::new(vec![])),
    ))
}

#[tokio::test]
async fn test_root_reports_service_info() {
    let (status, body) = get_json(healthy_app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "NUSA AI OCR Service");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["ocr_engine"], "StubOCR");
    assert_eq!(body["ai_processor"], "Scripted LLM");
}

#[tokio::test]
async fn test_health_endpoint_responds() {
    let (status, body) = get_json(healthy_app(), "/health").await;

    assert_eq!(status, StatusCode::OK, "Health endpoint should return 200 OK");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["ocr_ready"], true);
    assert_eq!(body["gemini_ready"], true);
    assert_eq!(body["allowed_origin"], "http://localhost:3000");
}

#[tokio::test]
async fn test_health_reports_unavailable_engine() {
    // Stub engines built with `failing` report themselves unavailable
    let app = build_router(create_test_app_state(
        Arc::new(StubOcrEngine::failing(OcrError::EngineUnavailable(
            "connection refused".into(),
        ))),
        Arc::new(ScriptedCompletionClient::new(vec![])),
    ));

    let (status, body) = get_json(app, "/health").await;

    // Health itself still answers 200; readiness is in the body
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["ocr_ready"], false);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = get_json(healthy_app(), "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/ocr/process"]["post"].is_object());
}

#[tokio::test]
async fn test_cors_preflight_is_allowed() {
    let response = healthy_app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/ocr/process")
                .header("Origin", "http://example.com")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
