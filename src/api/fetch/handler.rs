// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fetch API endpoint handler

use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::request::FetchApiRequest;
use super::response::FetchApiResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /api/fetch - Fetch a URL and flatten its content
///
/// # Request
/// - `url`: absolute http(s) URL (required)
///
/// # Response
/// - `contentType`: `text` for HTML/plain/XHTML bodies, `json` for JSON
/// - `text`: extracted text, at most 8000 characters
///
/// # Errors
/// - 400 Bad Request: `Missing url` / `Invalid URL`
/// - 415 Unsupported Media Type: upstream declared an unhandled type
/// - 502 Bad Gateway: upstream answered with a non-success status
/// - 500 Internal Server Error: anything else, with its message
pub async fn fetch_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<FetchApiResponse>, ApiError> {
    let request = FetchApiRequest::from_body(&body).map_err(|e| {
        error!("Unreadable fetch request body: {}", e);
        e
    })?;

    let url = request.validate().map_err(|e| {
        warn!("Fetch validation failed: {}", e);
        e
    })?;

    debug!("Fetch request for: {}", url);

    let result = state.fetcher.fetch(url).await.map_err(|e| {
        let api_error = ApiError::from(e);
        if matches!(api_error, ApiError::InternalError(_)) {
            error!("Fetch of {} failed: {}", url, api_error);
        } else {
            warn!("Fetch of {} rejected: {}", url, api_error);
        }
        api_error
    })?;

    info!(
        "Fetch complete: {} chars of {:?} from {}",
        result.text.chars().count(),
        result.content_type,
        url
    );

    Ok(Json(result.into()))
}
