//! Fixed prompt templates for the three extraction calls.
//!
//! Rendering is plain placeholder substitution; nothing is escaped.

use crate::schema::TagCategory;
use std::fmt;

/// One of the three independent completion calls made per task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extraction {
    Summary,
    Tags,
    Priority,
}

impl Extraction {
    pub const ALL: [Extraction; 3] = [Extraction::Summary, Extraction::Tags, Extraction::Priority];

    pub fn as_str(&self) -> &'static str {
        match self {
            Extraction::Summary => "summary",
            Extraction::Tags => "tags",
            Extraction::Priority => "priority",
        }
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SUMMARY_TEMPLATE: &str = "\
Transform this task into a 10-15 word actionable summary. Be specific about actions and timing.
Example: \"Schedule team meeting for Wednesday 3pm in conference room B\"

Task: {raw_text}

Summary must be 10-15 words:";

pub const TAGS_TEMPLATE: &str = "\
Classify this task into relevant categories from this list:
{tag_options}. Choose 1-3 most relevant tags. Respond with JSON array only.

Task: {raw_text}

Tags:";

pub const PRIORITY_TEMPLATE: &str = r#"Analyze this task and assign priority considering:
1. Urgency (time sensitivity)
2. Impact (consequences if not done)
3. Effort required
Use this scale: low, medium, high, critical

Respond with ONLY valid JSON in this format:
{ "priority": "value", "confidence": 0.0-1.0 }

Do not include any explanation or extra text.

Task: {raw_text}
"#;

pub fn summary_prompt(raw_text: &str) -> String {
    SUMMARY_TEMPLATE.replace("{raw_text}", raw_text)
}

/// Tags prompt with the vocabulary rendered as a literal list.
pub fn tags_prompt(raw_text: &str) -> String {
    // Options go in first so task text containing "{tag_options}" stays verbatim
    TAGS_TEMPLATE
        .replace("{tag_options}", &tag_options())
        .replace("{raw_text}", raw_text)
}

pub fn priority_prompt(raw_text: &str) -> String {
    PRIORITY_TEMPLATE.replace("{raw_text}", raw_text)
}

/// Render the prompt for one extraction call.
pub fn render(kind: Extraction, raw_text: &str) -> String {
    match kind {
        Extraction::Summary => summary_prompt(raw_text),
        Extraction::Tags => tags_prompt(raw_text),
        Extraction::Priority => priority_prompt(raw_text),
    }
}

fn tag_options() -> String {
    let quoted: Vec<String> = TagCategory::vocabulary()
        .into_iter()
        .map(|t| format!("\"{}\"", t))
        .collect();
    format!("[{}]", quoted.join(", "))
}
