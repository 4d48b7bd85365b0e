// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generation backend seam
//!
//! The model runtime is an external collaborator. A session only needs two
//! things from it: an asynchronous load with progress, and a streaming chat
//! completion over the transcript.

pub mod openai;

use async_trait::async_trait;
use futures::stream::Stream;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::session::Turn;

pub use openai::{OpenAiCompatBackend, OpenAiCompatLoader};

/// Incremental content fragments, ending when the completion ends
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, BackendError>> + Send>>;

/// Receives load progress while a backend initializes
pub type ProgressSink = mpsc::UnboundedSender<LoadProgress>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("stream error: {0}")]
    Stream(String),
}

/// A streaming chat completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<Turn>,
    pub temperature: f32,
}

/// One progress report emitted while a backend loads
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProgress {
    pub text: String,
    /// Completion ratio in `0.0..=1.0`, when known
    pub ratio: Option<f32>,
}

impl LoadProgress {
    pub fn new(text: impl Into<String>, ratio: Option<f32>) -> Self {
        Self {
            text: text.into(),
            ratio,
        }
    }

    /// `"<text> <pct>%"` when a ratio is known, the bare text otherwise
    pub fn describe(&self) -> String {
        match self.ratio {
            Some(ratio) => format!("{} {:.0}%", self.text, ratio.clamp(0.0, 1.0) * 100.0),
            None => self.text.clone(),
        }
    }
}

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Start a streaming completion over the given turns
    async fn stream_chat(&self, request: CompletionRequest) -> Result<FragmentStream, BackendError>;

    fn name(&self) -> &str;
}

#[async_trait]
pub trait BackendLoader: Send + Sync {
    /// Initialize a backend, reporting progress as it goes
    async fn load(&self, progress: ProgressSink) -> Result<Arc<dyn GenerationBackend>, BackendError>;
}
