// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Body flattening
//!
//! Turns fetched bodies into bounded plain text. Extraction is lossy and
//! best-effort: markup is removed with patterns, not parsed.

use regex::Regex;
use std::sync::OnceLock;

/// Declared content type of an upstream response, as far as extraction cares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// HTML, XHTML or plain text
    Text,
    /// JSON document
    Json,
    /// Anything else, carrying the raw header value
    Unsupported(String),
}

/// Classify a `Content-Type` header value
///
/// Matches on substrings so parameters such as `; charset=utf-8` are ignored.
pub fn classify(content_type: &str) -> DeclaredType {
    let lowered = content_type.to_ascii_lowercase();

    if lowered.contains("text/html")
        || lowered.contains("text/plain")
        || lowered.contains("application/xhtml")
    {
        DeclaredType::Text
    } else if lowered.contains("application/json") {
        DeclaredType::Json
    } else {
        DeclaredType::Unsupported(content_type.to_string())
    }
}

/// True when the URL uses the http or https scheme
pub fn is_http_url(url: &str) -> bool {
    let lowered = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

struct MarkupPatterns {
    script: Regex,
    style: Regex,
    tag: Regex,
}

impl MarkupPatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            script: Regex::new(r"(?is)<script.*?</script>")?,
            style: Regex::new(r"(?is)<style.*?</style>")?,
            tag: Regex::new(r"<[^>]+>")?,
        })
    }
}

fn markup_patterns() -> Option<&'static MarkupPatterns> {
    static PATTERNS: OnceLock<Option<MarkupPatterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| match MarkupPatterns::compile() {
            Ok(patterns) => Some(patterns),
            Err(e) => {
                tracing::error!("Failed to compile markup patterns: {}", e);
                None
            }
        })
        .as_ref()
}

/// Flatten an HTML (or plain text) body to a single line of text
///
/// Script and style blocks are dropped with their contents, every other tag
/// becomes a space, and whitespace runs collapse to one space. Falls back to
/// the raw body when the patterns are unavailable.
pub fn text_from_html(html: &str, max_chars: usize) -> String {
    let Some(patterns) = markup_patterns() else {
        return truncate_chars(html, max_chars);
    };

    let without_scripts = patterns.script.replace_all(html, "");
    let without_styles = patterns.style.replace_all(&without_scripts, "");
    let without_tags = patterns.tag.replace_all(&without_styles, " ");

    truncate_chars(&clean_text(&without_tags), max_chars)
}

/// Re-serialize a JSON body with two-space indentation
///
/// The cap is applied after serialization, so a truncated document may no
/// longer parse. Bodies that are not valid JSON are returned raw.
pub fn pretty_json(body: &str, max_chars: usize) -> String {
    let pretty = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok());

    match pretty {
        Some(text) => truncate_chars(&text, max_chars),
        None => {
            tracing::debug!("JSON body did not parse, returning raw text");
            truncate_chars(body, max_chars)
        }
    }
}

/// Cap text at `max_chars` characters without splitting a character
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Normalize whitespace: any run becomes a single space, ends trimmed
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
