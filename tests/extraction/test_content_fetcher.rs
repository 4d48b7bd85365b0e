// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ContentFetcher against a local upstream server
//!
//! Covers classification by declared type, markup flattening, JSON
//! re-serialization, the length cap and upstream failures.

use agentic_assistant::extraction::{
    ContentFetcher, ContentKind, ExtractionConfig, ExtractionError, DEFAULT_USER_AGENT,
    MAX_EXTRACTED_CHARS,
};
use tokio_test::{assert_err, assert_ok};

use crate::support::{large_json, spawn_upstream, SAMPLE_HTML_TEXT};

fn fetcher() -> ContentFetcher {
    ContentFetcher::new(ExtractionConfig::default()).unwrap()
}

#[tokio::test]
async fn test_html_is_flattened() {
    let upstream = spawn_upstream().await;
    let result = assert_ok!(fetcher().fetch(&format!("{}/page.html", upstream)).await);

    assert_eq!(result.content_type, ContentKind::Text);
    assert_eq!(result.text, SAMPLE_HTML_TEXT);
    assert!(!result.text.contains("alert"));
    assert!(!result.text.contains("color"));
    assert!(!result.text.contains('<'));
}

#[tokio::test]
async fn test_plain_text_and_xhtml_are_text() {
    let upstream = spawn_upstream().await;

    let notes = assert_ok!(fetcher().fetch(&format!("{}/notes.txt", upstream)).await);
    assert_eq!(notes.content_type, ContentKind::Text);
    assert_eq!(notes.text, "line one line two");

    let xhtml = assert_ok!(fetcher().fetch(&format!("{}/page.xhtml", upstream)).await);
    assert_eq!(xhtml.content_type, ContentKind::Text);
    assert_eq!(xhtml.text, "strict");
}

#[tokio::test]
async fn test_content_type_matching_ignores_case() {
    let upstream = spawn_upstream().await;
    let result = assert_ok!(fetcher().fetch(&format!("{}/shouting.html", upstream)).await);
    assert_eq!(result.text, "Loud");
}

#[tokio::test]
async fn test_small_json_is_pretty_printed() {
    let upstream = spawn_upstream().await;
    let result = assert_ok!(fetcher().fetch(&format!("{}/small.json", upstream)).await);

    assert_eq!(result.content_type, ContentKind::Json);
    assert_eq!(result.text, "{\n  \"name\": \"demo\",\n  \"ok\": true\n}");
}

#[tokio::test]
async fn test_large_json_is_cut_at_the_cap() {
    let upstream = spawn_upstream().await;
    let result = assert_ok!(fetcher().fetch(&format!("{}/large.json", upstream)).await);

    let full = serde_json::to_string_pretty(&large_json()).unwrap();
    assert!(full.chars().count() > MAX_EXTRACTED_CHARS);
    assert_eq!(result.text.chars().count(), MAX_EXTRACTED_CHARS);
    assert!(full.starts_with(&result.text));
    // The prefix is no longer a complete document.
    assert!(serde_json::from_str::<serde_json::Value>(&result.text).is_err());
}

#[tokio::test]
async fn test_custom_cap_is_honored() {
    let upstream = spawn_upstream().await;
    let config = ExtractionConfig {
        max_chars: 5,
        ..Default::default()
    };
    let fetcher = ContentFetcher::new(config).unwrap();
    let result = assert_ok!(fetcher.fetch(&format!("{}/page.html", upstream)).await);
    assert_eq!(result.text, "Doc H");
}

#[tokio::test]
async fn test_non_success_status_wins_over_content_type() {
    let upstream = spawn_upstream().await;

    let missing = assert_err!(fetcher().fetch(&format!("{}/missing", upstream)).await);
    assert_eq!(missing, ExtractionError::Upstream(404));

    let failing = assert_err!(fetcher().fetch(&format!("{}/error.json", upstream)).await);
    assert_eq!(failing, ExtractionError::Upstream(500));
    assert_eq!(failing.to_string(), "Upstream 500");
}

#[tokio::test]
async fn test_unsupported_type_is_named() {
    let upstream = spawn_upstream().await;
    let error = assert_err!(fetcher().fetch(&format!("{}/logo.png", upstream)).await);
    assert_eq!(error.to_string(), "Unsupported content-type: image/png");
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let error = assert_err!(fetcher().fetch("http://127.0.0.1:9/").await);
    assert!(matches!(error, ExtractionError::Transport(_)));
    assert!(!error.is_client_error());
}

#[tokio::test]
async fn test_request_identifies_client_and_disables_caching() {
    let upstream = spawn_upstream().await;
    let result = assert_ok!(fetcher().fetch(&format!("{}/headers", upstream)).await);

    let seen: serde_json::Value = serde_json::from_str(&result.text).unwrap();
    assert_eq!(seen["userAgent"], "AgenticAssistant/1.0");
    assert_eq!(seen["userAgent"], DEFAULT_USER_AGENT);
    assert_eq!(seen["cacheControl"], "no-store");
}
