// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Agentic Assistant

/// Semantic version number
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Capabilities shipped in this version
pub const FEATURES: &[&str] = &["url-fetch-proxy", "streaming-chat", "fetch-command"];

/// Banner printed at startup
pub fn get_version_string() -> String {
    format!("Agentic Assistant v{}", VERSION)
}
