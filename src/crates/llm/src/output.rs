//! JSON output parsing for completion text.
//!
//! Models asked for "JSON only" still wrap answers in Markdown fences or add a
//! leading sentence. This module recovers the JSON value when one is present.
//! It checks syntax only; what the value must look like is the caller's job.

use crate::error::{LlmError, Result};
use serde_json::Value;
use tracing::debug;

/// Parse completion text into a JSON value.
///
/// Tried in order: the whole trimmed text, the body of a ```` ```json ````
/// (or bare ```` ``` ````) fence, then the widest `{...}` or `[...]` span.
pub fn parse_json_output(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LlmError::MalformedJson("empty completion".to_string()));
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    for candidate in [extract_fenced(trimmed), extract_span(trimmed)]
        .into_iter()
        .flatten()
    {
        if let Ok(value) = serde_json::from_str(candidate) {
            debug!("Recovered JSON from surrounding completion text");
            return Ok(value);
        }
    }

    Err(LlmError::MalformedJson(truncate(trimmed, 200)))
}

/// Body of the first fenced code block, if any.
fn extract_fenced(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    // Skip an info string such as `json` or `JSON` up to the end of the line.
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Widest object or array span in the text.
fn extract_span(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c == '{' || c == '[')?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| text[start..=end].trim())
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
