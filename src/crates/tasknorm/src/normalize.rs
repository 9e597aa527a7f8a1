//! Turns the three raw completions for one task into canonical values.
//!
//! Everything here is lenient about *shape* (fences, casing, bare vs. object
//! priority) and strict about *content*: values are never invented, and
//! whether they are acceptable is left to the schema.

use crate::error::ProcessingError;
use crate::prompts::Extraction;
use llm::parse_json_output;
use serde::Deserialize;
use serde_json::Value;

/// Confidence assumed when the model gives a priority without one.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// The two shapes a priority completion comes back in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriorityReply {
    /// `{"priority": "high", "confidence": 0.9}`
    Object {
        #[serde(default)]
        priority: String,
        #[serde(default)]
        confidence: Option<f64>,
    },
    /// `"high"`
    Bare(String),
}

impl PriorityReply {
    /// Lower-case the level and fill in the default confidence.
    pub fn into_record(self) -> PriorityRecord {
        let (priority, confidence) = match self {
            PriorityReply::Object {
                priority,
                confidence,
            } => (priority, confidence.unwrap_or(DEFAULT_CONFIDENCE)),
            PriorityReply::Bare(priority) => (priority, DEFAULT_CONFIDENCE),
        };

        PriorityRecord {
            priority: priority.trim().to_lowercase(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriorityRecord {
    pub priority: String,
    pub confidence: f64,
}

/// Canonical triple for one task, prior to enum conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponses {
    pub summary: String,
    pub tags: Vec<String>,
    pub priority: PriorityRecord,
}

/// Summary text as returned.
///
/// JSON is looked for first (whole text, fenced block, embedded span) and
/// only a string is accepted from it. A reply that opens with a string
/// literal and then rambles keeps just the literal. Text with no JSON in it
/// is taken as the summary itself, minus any surrounding fence. Word count is
/// not checked here.
pub fn normalize_summary(raw: &str) -> Result<String, ProcessingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProcessingError::malformed(
            Extraction::Summary,
            "empty completion",
            raw,
        ));
    }

    match parse_json_output(trimmed) {
        Ok(Value::String(summary)) => return Ok(summary),
        Ok(other) => {
            return Err(ProcessingError::malformed(
                Extraction::Summary,
                format!("expected a string, got {}", json_kind(&other)),
                raw,
            ))
        }
        Err(_) => {}
    }

    if let Some(summary) = leading_string_literal(trimmed) {
        return Ok(summary);
    }

    let text = strip_fence(trimmed);
    if text.is_empty() {
        return Err(ProcessingError::malformed(
            Extraction::Summary,
            "empty code block",
            raw,
        ));
    }
    Ok(text.to_string())
}

/// `"..." trailing words` yields the quoted part.
fn leading_string_literal(text: &str) -> Option<String> {
    if !text.starts_with('"') {
        return None;
    }
    serde_json::Deserializer::from_str(text)
        .into_iter::<String>()
        .next()
        .and_then(|first| first.ok())
}

/// Body of a reply wrapped entirely in a ``` fence, else the text unchanged.
fn strip_fence(text: &str) -> &str {
    let inner = match text
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    {
        Some(inner) => inner,
        None => return text,
    };

    // An info string like `text` sits alone on the opening line
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim().contains(char::is_whitespace) => body.trim(),
        _ => inner.trim(),
    }
}

/// Tag strings, trimmed and lower-cased, first occurrence kept.
pub fn normalize_tags(raw: &str) -> Result<Vec<String>, ProcessingError> {
    let value = parse_json_output(raw)
        .map_err(|e| ProcessingError::malformed(Extraction::Tags, e.to_string(), raw))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ProcessingError::malformed(
                Extraction::Tags,
                format!("expected a JSON array, got {}", json_kind(&other)),
                raw,
            ))
        }
    };

    let mut tags: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let tag = match item {
            Value::String(tag) => tag,
            other => {
                return Err(ProcessingError::malformed(
                    Extraction::Tags,
                    format!("expected tag strings, got {}", json_kind(&other)),
                    raw,
                ))
            }
        };
        let tag = tag.trim().to_lowercase();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    Ok(tags)
}

/// Priority level and confidence from either reply shape.
pub fn normalize_priority(raw: &str) -> Result<PriorityRecord, ProcessingError> {
    let value = parse_json_output(raw)
        .map_err(|e| ProcessingError::malformed(Extraction::Priority, e.to_string(), raw))?;

    // A bare scalar is read as the level itself
    let value = match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        other => other,
    };

    let reply: PriorityReply = serde_json::from_value(value).map_err(|e| {
        ProcessingError::malformed(
            Extraction::Priority,
            format!("unrecognized priority reply: {}", e),
            raw,
        )
    })?;

    Ok(reply.into_record())
}

/// Normalize all three completions for one task.
///
/// Errors are reported in call order: summary, tags, priority.
pub fn normalize(
    summary: &str,
    tags: &str,
    priority: &str,
) -> Result<NormalizedResponses, ProcessingError> {
    Ok(NormalizedResponses {
        summary: normalize_summary(summary)?,
        tags: normalize_tags(tags)?,
        priority: normalize_priority(priority)?,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_bare_string() {
        let record = normalize_priority("\"high\"").unwrap();
        assert_eq!(record.priority, "high");
        assert_eq!(record.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_priority_object_shape() {
        let record = normalize_priority(r#"{"priority": "High", "confidence": 0.95}"#).unwrap();
        assert_eq!(record.priority, "high");
        assert_eq!(record.confidence, 0.95);
    }

    #[test]
    fn test_priority_object_without_confidence() {
        let record = normalize_priority(r#"{"priority": "LOW"}"#).unwrap();
        assert_eq!(record.priority, "low");
        assert_eq!(record.confidence, 0.8);

        let record = normalize_priority(r#"{"priority": "low", "confidence": null}"#).unwrap();
        assert_eq!(record.confidence, 0.8);
    }

    #[test]
    fn test_priority_object_without_level() {
        // Left empty so the schema rejects it
        let record = normalize_priority(r#"{"confidence": 0.4}"#).unwrap();
        assert_eq!(record.priority, "");
        assert_eq!(record.confidence, 0.4);
    }

    #[test]
    fn test_priority_in_fenced_block_with_chatter() {
        let raw = "Sure!\n```json\n{\"priority\": \"Critical\", \"confidence\": 1.0}\n```";
        let record = normalize_priority(raw).unwrap();
        assert_eq!(record.priority, "critical");
        assert_eq!(record.confidence, 1.0);
    }

    #[test]
    fn test_priority_non_numeric_confidence_is_malformed() {
        let err = normalize_priority(r#"{"priority": "high", "confidence": "very"}"#).unwrap_err();
        assert_eq!(err.call(), Some(Extraction::Priority));
    }

    #[test]
    fn test_priority_not_json() {
        let err = normalize_priority("I think it is high").unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::MalformedResponse {
                call: Extraction::Priority,
                ..
            }
        ));
    }

    #[test]
    fn test_priority_bare_scalar_kept_as_level() {
        let record = normalize_priority("3").unwrap();
        assert_eq!(record.priority, "3");
        assert_eq!(record.confidence, DEFAULT_CONFIDENCE);

        let record = normalize_priority("true").unwrap();
        assert_eq!(record.priority, "true");
    }

    #[test]
    fn test_priority_reply_variants() {
        let bare: PriorityReply = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(bare, PriorityReply::Bare("Medium".into()));

        let object: PriorityReply =
            serde_json::from_str(r#"{"priority": "low", "confidence": 0.3}"#).unwrap();
        assert_eq!(
            object,
            PriorityReply::Object {
                priority: "low".into(),
                confidence: Some(0.3)
            }
        );
    }

    #[test]
    fn test_tags_lowercased_and_deduped() {
        let tags = normalize_tags(r#"["Work", " shopping", "work"]"#).unwrap();
        assert_eq!(tags, vec!["work", "shopping"]);
    }

    #[test]
    fn test_tags_keep_unknown_values_for_validation() {
        let tags = normalize_tags(r#"["Work", "shopping", "unknown_tag"]"#).unwrap();
        assert_eq!(tags, vec!["work", "shopping", "unknown_tag"]);
    }

    #[test]
    fn test_tags_must_be_array_of_strings() {
        assert!(normalize_tags(r#"{"tags": ["work"]}"#).is_err());
        assert!(normalize_tags(r#"["work", 3]"#).is_err());
        assert!(normalize_tags("work, personal").is_err());
    }

    #[test]
    fn test_summary_json_string_unwrapped() {
        let summary =
            normalize_summary("\"Buy milk and eggs at the store after work today\"").unwrap();
        assert_eq!(summary, "Buy milk and eggs at the store after work today");
    }

    #[test]
    fn test_summary_plain_text_accepted() {
        let summary =
            normalize_summary("  Buy milk and eggs at the store after work today\n").unwrap();
        assert_eq!(summary, "Buy milk and eggs at the store after work today");
    }

    #[test]
    fn test_summary_in_json_fence() {
        let raw = "```json\n\"Buy milk and eggs at the store after work today\"\n```";
        let summary = normalize_summary(raw).unwrap();
        assert_eq!(summary, "Buy milk and eggs at the store after work today");
    }

    #[test]
    fn test_summary_quoted_with_trailing_chatter() {
        let raw = "\"Buy milk and eggs at the store after work today\" (10 words)";
        let summary = normalize_summary(raw).unwrap();
        assert_eq!(summary, "Buy milk and eggs at the store after work today");
    }

    #[test]
    fn test_summary_plain_text_in_fence() {
        let raw = "```\nBuy milk and eggs at the store after work today\n```";
        assert_eq!(
            normalize_summary(raw).unwrap(),
            "Buy milk and eggs at the store after work today"
        );

        let raw = "```text\nBuy milk and eggs at the store after work today\n```";
        assert_eq!(
            normalize_summary(raw).unwrap(),
            "Buy milk and eggs at the store after work today"
        );
    }

    #[test]
    fn test_summary_plain_text_with_inner_quotes() {
        let raw = "Send the \"Q3 plan\" draft to Dana before the Friday review meeting";
        assert_eq!(normalize_summary(raw).unwrap(), raw);
    }

    #[test]
    fn test_summary_empty_fence_is_malformed() {
        assert!(normalize_summary("```\n```").is_err());
    }

    #[test]
    fn test_summary_rejects_structured_json() {
        let err = normalize_summary(r#"{"summary": "Buy milk"}"#).unwrap_err();
        assert_eq!(err.call(), Some(Extraction::Summary));
        assert!(normalize_summary("").is_err());
    }

    #[test]
    fn test_normalize_reports_first_failing_call() {
        let err = normalize("\"ok summary\"", "not json", "also not json").unwrap_err();
        assert_eq!(err.call(), Some(Extraction::Tags));
    }
}
