// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OpenAI-compatible completion server backend
//!
//! Talks to any server exposing `/v1/models` and a streaming
//! `/v1/chat/completions` (llama.cpp server, Ollama, vLLM, ...).

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{future, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    BackendError, BackendLoader, CompletionRequest, FragmentStream, GenerationBackend,
    LoadProgress, ProgressSink,
};
use crate::config::ChatConfig;
use crate::session::Turn;

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [Turn],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Outcome of decoding one SSE `data:` payload
#[derive(Debug, PartialEq)]
pub(crate) enum SseItem {
    Fragment(String),
    Skip,
    Done,
    Error(BackendError),
}

pub(crate) fn parse_sse_data(data: &str) -> SseItem {
    let data = data.trim();
    if data == "[DONE]" {
        return SseItem::Done;
    }
    if data.is_empty() {
        return SseItem::Skip;
    }

    let chunk: ChatCompletionChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            return SseItem::Error(BackendError::Stream(format!(
                "invalid chunk: {}, data: {}",
                e, data
            )))
        }
    };

    if let Some(error) = chunk.error {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .or_else(|| error.as_str().map(str::to_string))
            .unwrap_or_else(|| error.to_string());
        return SseItem::Error(BackendError::Stream(message));
    }

    match chunk.choices.into_iter().next().and_then(|c| c.delta.content) {
        Some(content) if !content.is_empty() => SseItem::Fragment(content),
        _ => SseItem::Skip,
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Streaming chat completions over HTTP + server-sent events
pub struct OpenAiCompatBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatBackend {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: trim_base(base_url),
            model: model.into(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiCompatBackend {
    async fn stream_chat(&self, request: CompletionRequest) -> Result<FragmentStream, BackendError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            stream: true,
        };

        debug!(
            "Requesting completion from {} over {} turns",
            url,
            request.messages.len()
        );

        let response = self
            .authorize(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let fragments = response
            .bytes_stream()
            .eventsource()
            .map(|event| match event {
                Ok(event) => parse_sse_data(&event.data),
                Err(e) => SseItem::Error(BackendError::Stream(e.to_string())),
            })
            .take_while(|item| future::ready(*item != SseItem::Done))
            .filter_map(|item| {
                future::ready(match item {
                    SseItem::Fragment(text) => Some(Ok(text)),
                    SseItem::Error(e) => Some(Err(e)),
                    SseItem::Skip | SseItem::Done => None,
                })
            });

        Ok(Box::pin(fragments))
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}

/// Connects to a completion server and checks the model is served
pub struct OpenAiCompatLoader {
    config: ChatConfig,
}

impl OpenAiCompatLoader {
    pub fn new(config: ChatConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BackendLoader for OpenAiCompatLoader {
    async fn load(&self, progress: ProgressSink) -> Result<Arc<dyn GenerationBackend>, BackendError> {
        let base_url = trim_base(&self.config.backend_url);
        let _ = progress.send(LoadProgress::new(
            format!("Connecting to {}", base_url),
            Some(0.0),
        ));

        let backend = OpenAiCompatBackend::new(
            &base_url,
            self.config.model_id.clone(),
            self.config.api_key.clone(),
        )?;

        let response = backend
            .authorize(backend.client.get(format!("{}/v1/models", base_url)))
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(format!("{}: {}", base_url, e)))?;

        if !response.status().is_success() {
            return Err(BackendError::Status {
                status: response.status().as_u16(),
                message: format!("model listing failed at {}", base_url),
            });
        }

        let _ = progress.send(LoadProgress::new("Checking model", Some(0.5)));

        match response.json::<ModelList>().await {
            Ok(list) if !list.data.is_empty() => {
                if !list.data.iter().any(|m| m.id == self.config.model_id) {
                    let served: Vec<_> = list.data.iter().map(|m| m.id.as_str()).collect();
                    return Err(BackendError::Unavailable(format!(
                        "model '{}' is not served (available: {})",
                        self.config.model_id,
                        served.join(", ")
                    )));
                }
            }
            Ok(_) => warn!("Model listing at {} is empty, continuing", base_url),
            Err(e) => warn!("Could not decode model listing at {}: {}", base_url, e),
        }

        let _ = progress.send(LoadProgress::new(
            format!("Model {} ready", self.config.model_id),
            Some(1.0),
        ));
        info!("Generation backend ready: {} @ {}", self.config.model_id, base_url);

        Ok(Arc::new(backend))
    }
}
