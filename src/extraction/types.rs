// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for URL content extraction

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of text produced by a successful extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Flattened HTML or plain text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Bounded text extracted from a remote resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// How the body was interpreted
    pub content_type: ContentKind,
    /// Extracted text, capped at the configured maximum
    pub text: String,
}

/// Errors that can occur while extracting a URL
///
/// Display strings are the exact messages returned to HTTP clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// No URL was supplied, or it was not a string
    #[error("Missing url")]
    MissingUrl,

    /// URL scheme is not http or https
    #[error("Invalid URL")]
    InvalidUrl,

    /// Upstream answered with a non-success status
    #[error("Upstream {0}")]
    Upstream(u16),

    /// Declared content type is not one we know how to flatten
    #[error("Unsupported content-type: {0}")]
    UnsupportedContentType(String),

    /// Request could not be sent or the body could not be read
    #[error("{0}")]
    Transport(String),
}

impl ExtractionError {
    /// True for failures caused by the caller's input rather than the network
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingUrl | Self::InvalidUrl)
    }
}
