// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! URL content extraction
//!
//! Fetches a remote resource and reduces it to bounded text that can be
//! injected into a chat transcript.
//!
//! ## Architecture
//!
//! ```text
//! URL → is_http_url → ContentFetcher (1 GET, no cache) → classify(Content-Type)
//!                                                          ├─ text/html, text/plain, xhtml → text_from_html
//!                                                          ├─ application/json            → pretty_json
//!                                                          └─ other                       → UnsupportedContentType
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let fetcher = ContentFetcher::new(ExtractionConfig::from_env())?;
//! let result = fetcher.fetch("https://example.com").await?;
//! assert!(result.text.chars().count() <= MAX_EXTRACTED_CHARS);
//! ```

pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod types;

pub use config::{ExtractionConfig, DEFAULT_USER_AGENT, MAX_EXTRACTED_CHARS};
pub use extractor::{classify, is_http_url, pretty_json, text_from_html, truncate_chars, DeclaredType};
pub use fetcher::ContentFetcher;
pub use types::{ContentKind, ExtractionError, ExtractionResult};
