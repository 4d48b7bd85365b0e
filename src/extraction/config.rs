// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for URL content extraction
//!
//! Defines the outbound request settings and the fixed output cap.

use std::env;

/// Maximum characters returned for any extracted body
pub const MAX_EXTRACTED_CHARS: usize = 8000;

/// Identifying client agent sent with every outbound fetch
pub const DEFAULT_USER_AGENT: &str = "AgenticAssistant/1.0";

/// Configuration for the extraction service
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Maximum characters in the returned text (default: 8000)
    pub max_chars: usize,
    /// User-Agent header for outbound requests
    pub user_agent: String,
    /// Timeout for the single upstream request in seconds (default: 15)
    pub timeout_secs: u64,
    /// Maximum redirects followed before giving up (default: 5)
    pub max_redirects: usize,
}

impl ExtractionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            max_chars: MAX_EXTRACTED_CHARS,
            user_agent: env::var("FETCH_USER_AGENT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            max_redirects: env::var("FETCH_MAX_REDIRECTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5)
                .min(10),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chars == 0 {
            return Err("max_chars must be at least 1".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_chars: MAX_EXTRACTED_CHARS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 15,
            max_redirects: 5,
        }
    }
}
