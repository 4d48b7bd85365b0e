// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session side of the URL fetch proxy

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::api::{FetchApiPayload, FetchApiRequest};
use crate::extraction::{ContentFetcher, ExtractionError, ExtractionResult};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    /// The extraction service answered with an error payload
    #[error("{0}")]
    Rejected(String),

    /// The extraction service could not be reached or answered garbage
    #[error("{0}")]
    Transport(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ExtractionResult, FetchFailure>;
}

/// Calls a remote `/api/fetch` endpoint
pub struct ProxyClient {
    client: Client,
    endpoint: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/fetch", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl UrlFetcher for ProxyClient {
    async fn fetch(&self, url: &str) -> Result<ExtractionResult, FetchFailure> {
        debug!("Proxy fetch of {} via {}", url, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&FetchApiRequest::new(url))
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        // Error payloads come with 4xx/5xx statuses; the body decides.
        let payload: FetchApiPayload = response
            .json()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        match payload {
            FetchApiPayload::Success(body) => Ok(body.into()),
            FetchApiPayload::Failure(body) => Err(FetchFailure::Rejected(body.error)),
        }
    }
}

#[async_trait]
impl UrlFetcher for ContentFetcher {
    async fn fetch(&self, url: &str) -> Result<ExtractionResult, FetchFailure> {
        ContentFetcher::fetch(self, url)
            .await
            .map_err(|e: ExtractionError| FetchFailure::Rejected(e.to_string()))
    }
}
