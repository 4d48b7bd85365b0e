// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fetch API response types

use serde::{Deserialize, Serialize};

use crate::api::errors::ErrorResponse;
use crate::extraction::{ContentKind, ExtractionResult};

/// Response body for a successful POST /api/fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchApiResponse {
    /// `text` or `json`
    pub content_type: ContentKind,

    /// Extracted text, at most 8000 characters
    pub text: String,
}

impl From<ExtractionResult> for FetchApiResponse {
    fn from(result: ExtractionResult) -> Self {
        Self {
            content_type: result.content_type,
            text: result.text,
        }
    }
}

impl From<FetchApiResponse> for ExtractionResult {
    fn from(response: FetchApiResponse) -> Self {
        Self {
            content_type: response.content_type,
            text: response.text,
        }
    }
}

/// Any body the endpoint can answer with, as seen by a client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FetchApiPayload {
    Failure(ErrorResponse),
    Success(FetchApiResponse),
}
