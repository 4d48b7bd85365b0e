// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Router-level tests for POST /api/fetch
//!
//! Validation failures are answered before any outbound request, so these
//! run without a network.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use agentic_assistant::api::{create_app, AppState, ErrorResponse, HealthResponse};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

fn app() -> Router {
    create_app(Arc::new(AppState::new_for_test()))
}

fn post_fetch(body: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/fetch")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    for body in [
        r#"{}"#,
        r#"{"url": null}"#,
        r#"{"url": ""}"#,
        r#"{"url": 42}"#,
        r#""https://example.com""#,
        "42",
        "true",
        "[]",
    ] {
        let (status, json) = send(post_fetch(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(json["error"], "Missing url");
    }
}

#[tokio::test]
async fn test_non_http_scheme_is_bad_request() {
    for body in [
        r#"{"url": "ftp://example.com/file"}"#,
        r#"{"url": "file:///etc/passwd"}"#,
        r#"{"url": "javascript:alert(1)"}"#,
        r#"{"url": "example.com"}"#,
    ] {
        let (status, json) = send(post_fetch(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        let error: ErrorResponse = serde_json::from_value(json).unwrap();
        assert_eq!(error.error, "Invalid URL");
    }
}

#[tokio::test]
async fn test_unparseable_body_is_internal_error() {
    let (status, json) = send(post_fetch("not json")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!json["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_null_body_is_internal_error() {
    let (status, json) = send(post_fetch("null")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!json["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_route_rejects_get() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/fetch")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, agentic_assistant::version::VERSION);
}
