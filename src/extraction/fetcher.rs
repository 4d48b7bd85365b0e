// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP content fetching
//!
//! Performs the single outbound request behind `/api/fetch` and hands the
//! body to the extractor that matches its declared type.

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::config::ExtractionConfig;
use super::extractor::{classify, is_http_url, pretty_json, text_from_html, DeclaredType};
use super::types::{ContentKind, ExtractionError, ExtractionResult};

/// Fetches a URL and flattens its body to bounded text
#[derive(Clone)]
pub struct ContentFetcher {
    client: Client,
    config: ExtractionConfig,
}

impl ContentFetcher {
    /// Create a new content fetcher
    pub fn new(config: ExtractionConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch a single URL and extract its text
    ///
    /// No retries and no caching: every call performs exactly one request,
    /// unless the URL is rejected before any I/O happens.
    pub async fn fetch(&self, url: &str) -> Result<ExtractionResult, ExtractionError> {
        if !is_http_url(url) {
            warn!("Rejected non-http(s) URL: {}", url);
            return Err(ExtractionError::InvalidUrl);
        }

        debug!("Fetching content from: {}", url);

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !status.is_success() {
            warn!("Upstream {} for: {}", status.as_u16(), url);
            return Err(ExtractionError::Upstream(status.as_u16()));
        }

        let max_chars = self.config.max_chars;
        let result = match classify(&content_type) {
            DeclaredType::Text => ExtractionResult {
                content_type: ContentKind::Text,
                text: text_from_html(&self.read_body(response).await?, max_chars),
            },
            DeclaredType::Json => ExtractionResult {
                content_type: ContentKind::Json,
                text: pretty_json(&self.read_body(response).await?, max_chars),
            },
            DeclaredType::Unsupported(declared) => {
                warn!("Unsupported content-type '{}' for: {}", declared, url);
                return Err(ExtractionError::UnsupportedContentType(declared));
            }
        };

        info!(
            "Extracted {} chars ({:?}) from: {}",
            result.text.chars().count(),
            result.content_type,
            url
        );

        Ok(result)
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<String, ExtractionError> {
        response
            .text()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))
    }

    /// Get the configuration
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }
}
