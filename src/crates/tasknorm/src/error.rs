//! Error types for tasknorm
//!
//! `ValidationError` is raised by the schema gate, `ProcessingError` by a
//! single `process` call, and `Error` unifies both with configuration and
//! export failures for callers that do not care which layer failed.

use crate::prompts::Extraction;
use llm::LlmError;
use thiserror::Error;

/// Result type alias for tasknorm operations
pub type Result<T> = std::result::Result<T, Error>;

/// A field value rejected by the schema.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field} {value:?}: {reason}")]
pub struct ValidationError {
    /// Name of the offending field (`summary`, `tags`, `priority`, ...)
    pub field: &'static str,
    /// The raw value that was rejected
    pub value: String,
    /// Human-readable reason
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of one task's trip through the pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The provider call failed permanently or ran out of retries
    #[error("{call} completion failed: {source}")]
    Provider {
        call: Extraction,
        #[source]
        source: LlmError,
    },

    /// The completion came back but not in the shape the pipeline needs
    #[error("{call} completion was malformed: {reason}")]
    MalformedResponse {
        call: Extraction,
        reason: String,
        raw: String,
    },

    /// A normalized value failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ProcessingError {
    pub(crate) fn malformed(call: Extraction, reason: impl Into<String>, raw: &str) -> Self {
        Self::MalformedResponse {
            call,
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }

    /// Which extraction call failed, when the failure is tied to one.
    pub fn call(&self) -> Option<Extraction> {
        match self {
            Self::Provider { call, .. } | Self::MalformedResponse { call, .. } => Some(*call),
            Self::Validation(_) => None,
        }
    }

    /// True when the provider failure was transient (retries exhausted).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Provider { source, .. } if source.is_retryable())
    }
}

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration; fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input or output record rejected by the schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A single task failed to process
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
