// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! User input grammar

/// Reserved prefix of the fetch command, including its separating space
pub const FETCH_PREFIX: &str = "/fetch ";

/// A parsed user submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    /// Ordinary text forwarded to the generation backend
    Plain(String),
    /// `/fetch <url>`; the URL is not validated here
    Fetch { url: String },
}

impl ChatInput {
    /// Parse raw input; blank input yields `None`
    ///
    /// The command is only recognized at the start of the trimmed input.
    pub fn parse(raw: &str) -> Option<Self> {
        let content = raw.trim();
        if content.is_empty() {
            return None;
        }

        match content.strip_prefix(FETCH_PREFIX) {
            Some(rest) => Some(Self::Fetch {
                url: rest.trim().to_string(),
            }),
            None => Some(Self::Plain(content.to_string())),
        }
    }
}
