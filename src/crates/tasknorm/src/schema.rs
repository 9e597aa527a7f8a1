//! Task records and the validation rules they enforce.
//!
//! [`Priority`] and [`TagCategory`] are the only source of valid values.
//! [`TaskInput`] and [`TaskOutput`] can only be obtained through validating
//! constructors (deserialization included), so holding one means its
//! invariants hold.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive word-count bounds for a summary.
pub const SUMMARY_MIN_WORDS: usize = 10;
pub const SUMMARY_MAX_WORDS: usize = 15;

/// Priority level of a task, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ValidationError::new("priority", s, "expected one of low, medium, high, critical")
            })
    }
}

/// Category label a task can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    Work,
    Personal,
    Shopping,
    Communication,
    Learning,
    Health,
    Finance,
    Other,
}

impl TagCategory {
    pub const ALL: [TagCategory; 8] = [
        TagCategory::Work,
        TagCategory::Personal,
        TagCategory::Shopping,
        TagCategory::Communication,
        TagCategory::Learning,
        TagCategory::Health,
        TagCategory::Finance,
        TagCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::Work => "work",
            TagCategory::Personal => "personal",
            TagCategory::Shopping => "shopping",
            TagCategory::Communication => "communication",
            TagCategory::Learning => "learning",
            TagCategory::Health => "health",
            TagCategory::Finance => "finance",
            TagCategory::Other => "other",
        }
    }

    /// Wire values of the whole vocabulary, in declaration order.
    pub fn vocabulary() -> Vec<&'static str> {
        Self::ALL.iter().map(TagCategory::as_str).collect()
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TagCategory::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ValidationError::new(
                    "tags",
                    s,
                    format!("not in tag vocabulary ({})", TagCategory::vocabulary().join(", ")),
                )
            })
    }
}

/// Parse tag strings in order; the first unknown tag fails the whole list.
pub fn parse_tags<S: AsRef<str>>(tags: &[S]) -> Result<Vec<TagCategory>, ValidationError> {
    tags.iter().map(|t| t.as_ref().parse()).collect()
}

/// A raw task line as submitted by a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskInput {
    raw_text: String,
    source: String,
    created_at: DateTime<Utc>,
}

impl TaskInput {
    /// Minimum length of `raw_text`, in characters.
    pub const MIN_LENGTH: usize = 3;

    /// Default `source` tag.
    pub const DEFAULT_SOURCE: &'static str = "user";

    /// Validate and wrap raw task text.
    pub fn new(raw_text: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_source(raw_text, Self::DEFAULT_SOURCE)
    }

    /// Validate and wrap raw task text with an explicit source tag.
    pub fn with_source(
        raw_text: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let raw_text = raw_text.into();

        if raw_text.trim().is_empty() {
            return Err(ValidationError::new("raw_text", raw_text, "must not be blank"));
        }
        if raw_text.chars().count() < Self::MIN_LENGTH {
            return Err(ValidationError::new(
                "raw_text",
                raw_text,
                format!("must be at least {} characters", Self::MIN_LENGTH),
            ));
        }

        Ok(Self {
            raw_text,
            source: source.into(),
            created_at: Utc::now(),
        })
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A validated, structured task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedTaskOutput")]
pub struct TaskOutput {
    summary: String,
    tags: Vec<TagCategory>,
    priority: Priority,
    original_text: String,
    confidence_score: Option<f64>,
    processing_time_ms: Option<f64>,
}

impl TaskOutput {
    /// Build a record, enforcing every field rule.
    ///
    /// The summary is stored whitespace-normalized (single spaces).
    pub fn new(
        summary: impl Into<String>,
        tags: Vec<TagCategory>,
        priority: Priority,
        original_text: impl Into<String>,
        confidence_score: Option<f64>,
        processing_time_ms: Option<f64>,
    ) -> Result<Self, ValidationError> {
        let summary = normalize_summary(&summary.into())?;

        if tags.is_empty() {
            return Err(ValidationError::new("tags", "[]", "at least one tag is required"));
        }

        if let Some(score) = confidence_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(ValidationError::new(
                    "confidence_score",
                    score.to_string(),
                    "must be between 0.0 and 1.0",
                ));
            }
        }

        if let Some(ms) = processing_time_ms {
            if !ms.is_finite() || ms < 0.0 {
                return Err(ValidationError::new(
                    "processing_time_ms",
                    ms.to_string(),
                    "must be a non-negative number",
                ));
            }
        }

        Ok(Self {
            summary,
            tags,
            priority,
            original_text: original_text.into(),
            confidence_score,
            processing_time_ms,
        })
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn tags(&self) -> &[TagCategory] {
        &self.tags
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn confidence_score(&self) -> Option<f64> {
        self.confidence_score
    }

    pub fn processing_time_ms(&self) -> Option<f64> {
        self.processing_time_ms
    }
}

/// Check the word bound and collapse whitespace runs.
fn normalize_summary(summary: &str) -> Result<String, ValidationError> {
    let words: Vec<&str> = summary.split_whitespace().collect();
    if words.len() < SUMMARY_MIN_WORDS || words.len() > SUMMARY_MAX_WORDS {
        return Err(ValidationError::new(
            "summary",
            summary,
            format!(
                "must be {}-{} words, got {}",
                SUMMARY_MIN_WORDS,
                SUMMARY_MAX_WORDS,
                words.len()
            ),
        ));
    }
    Ok(words.join(" "))
}

/// Wire shape of a `TaskOutput`; deserialization goes through `TaskOutput::new`.
#[derive(Deserialize)]
struct UncheckedTaskOutput {
    summary: String,
    tags: Vec<String>,
    priority: String,
    original_text: String,
    #[serde(default)]
    confidence_score: Option<f64>,
    #[serde(default)]
    processing_time_ms: Option<f64>,
}

impl TryFrom<UncheckedTaskOutput> for TaskOutput {
    type Error = ValidationError;

    fn try_from(raw: UncheckedTaskOutput) -> Result<Self, Self::Error> {
        TaskOutput::new(
            raw.summary,
            parse_tags(&raw.tags)?,
            raw.priority.parse()?,
            raw.original_text,
            raw.confidence_score,
            raw.processing_time_ms,
        )
    }
}
