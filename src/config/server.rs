// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::net::SocketAddr;

use crate::extraction::ExtractionConfig;

/// Settings for the HTTP service hosting `/api/fetch`
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub extraction: ExtractionConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            extraction: ExtractionConfig::from_env(),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("invalid listen address {}:{}: {}", self.host, self.port, e))
    }

    pub fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;
        self.extraction.validate()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            extraction: ExtractionConfig::default(),
        }
    }
}
