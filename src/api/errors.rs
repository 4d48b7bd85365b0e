// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::extraction::ExtractionError;

/// Body of every non-200 response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    MissingUrl,
    InvalidUrl,
    Upstream(u16),
    UnsupportedContentType(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl => 400,
            ApiError::UnsupportedContentType(_) => 415,
            ApiError::Upstream(_) => 502,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingUrl => write!(f, "Missing url"),
            ApiError::InvalidUrl => write!(f, "Invalid URL"),
            ApiError::Upstream(status) => write!(f, "Upstream {}", status),
            ApiError::UnsupportedContentType(ct) => write!(f, "Unsupported content-type: {}", ct),
            ApiError::InternalError(msg) if msg.trim().is_empty() => write!(f, "Unknown error"),
            ApiError::InternalError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::MissingUrl => ApiError::MissingUrl,
            ExtractionError::InvalidUrl => ApiError::InvalidUrl,
            ExtractionError::Upstream(status) => ApiError::Upstream(status),
            ExtractionError::UnsupportedContentType(ct) => ApiError::UnsupportedContentType(ct),
            ExtractionError::Transport(msg) => ApiError::InternalError(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
