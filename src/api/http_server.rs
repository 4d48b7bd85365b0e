// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::fetch::fetch_handler;
use crate::config::ServerConfig;
use crate::extraction::{ContentFetcher, ExtractionConfig};

pub struct AppState {
    pub fetcher: ContentFetcher,
}

impl AppState {
    pub fn new(extraction: ExtractionConfig) -> anyhow::Result<Self> {
        Ok(Self {
            fetcher: ContentFetcher::new(extraction)?,
        })
    }

    /// State with default settings, for router tests
    pub fn new_for_test() -> Self {
        Self {
            fetcher: ContentFetcher::new(ExtractionConfig::default())
                .expect("default HTTP client should build"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/fetch", post(fetch_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    config.validate().map_err(anyhow::Error::msg)?;

    let state = Arc::new(AppState::new(config.extraction.clone())?);
    let app = create_app(state);

    let addr = config.socket_addr().map_err(anyhow::Error::msg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn health_handler(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::version::VERSION.to_string(),
    })
}
