// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;

/// Fixed system instruction that opens every transcript
pub const SYSTEM_PROMPT: &str = "You are an agentic assistant.
Rules:
- Answer clearly, step by step when needed.
- If asked to inspect a URL, suggest the /fetch {url} command to retrieve its content through the proxy.
- If an action needs authenticated access, explain what has to be done and propose solutions.
- Be concise, but complete and pragmatic.";

/// Assistant greeting shown when a session starts
pub const GREETING: &str = "Hello, I am your AI assistant. How can I help?";

/// Sampling temperature for every completion
pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// Settings for an interactive chat session
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of an OpenAI-compatible completion server
    pub backend_url: String,
    /// Model identifier sent with each completion request
    pub model_id: String,
    /// Optional bearer token for the completion server
    pub api_key: Option<String>,
    /// Base URL of the service exposing `/api/fetch`
    pub proxy_url: String,
    pub temperature: f32,
    pub system_prompt: String,
    pub greeting: String,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: env::var("BACKEND_URL").unwrap_or(defaults.backend_url),
            model_id: env::var("MODEL_ID").unwrap_or(defaults.model_id),
            api_key: env::var("BACKEND_API_KEY").ok().filter(|k| !k.is_empty()),
            proxy_url: env::var("PROXY_URL").unwrap_or(defaults.proxy_url),
            temperature: env::var("CHAT_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
            system_prompt: defaults.system_prompt,
            greeting: defaults.greeting,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if url::Url::parse(&self.backend_url).is_err() {
            return Err(format!("invalid backend url: {}", self.backend_url));
        }
        if url::Url::parse(&self.proxy_url).is_err() {
            return Err(format!("invalid proxy url: {}", self.proxy_url));
        }
        if self.model_id.trim().is_empty() {
            return Err("model_id cannot be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:11434".to_string(),
            model_id: "phi3:mini".to_string(),
            api_key: None,
            proxy_url: "http://127.0.0.1:8080".to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: SYSTEM_PROMPT.to_string(),
            greeting: GREETING.to_string(),
        }
    }
}
