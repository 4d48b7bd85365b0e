// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fetch API request types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::extraction::is_http_url;

/// Request body for POST /api/fetch
///
/// `url` is kept as a raw JSON value so that a present-but-non-string value
/// is reported as missing rather than as a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchApiRequest {
    #[serde(default)]
    pub url: Option<Value>,
}

impl FetchApiRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(Value::String(url.into())),
        }
    }

    /// Parse a raw request body
    ///
    /// Unparseable JSON and a `null` body are internal errors carrying a
    /// message. Any other non-object value has no `url` and fails validation
    /// as missing.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| ApiError::InternalError(e.to_string()))?;

        match value {
            Value::Object(mut fields) => Ok(Self {
                url: fields.remove("url").filter(|url| !url.is_null()),
            }),
            Value::Null => Err(ApiError::InternalError(
                "Cannot read properties of null (reading 'url')".to_string(),
            )),
            _ => Ok(Self { url: None }),
        }
    }

    /// Validate the request and return the URL to fetch
    pub fn validate(&self) -> Result<&str, ApiError> {
        let url = match &self.url {
            Some(Value::String(url)) if !url.is_empty() => url.as_str(),
            _ => return Err(ApiError::MissingUrl),
        };
        if !is_http_url(url) {
            return Err(ApiError::InvalidUrl);
        }
        Ok(url)
    }
}
