//! Task Processor - pipeline entry point
//!
//! Runs the three extraction calls for one task concurrently against a shared
//! completion client, then normalizes, validates and times the result.

use crate::error::ProcessingError;
use crate::normalize::normalize;
use crate::prompts::{self, Extraction};
use crate::schema::{parse_tags, Priority, TaskInput, TaskOutput};
use crate::text::preview;
use llm::CompletionClient;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Normalizes raw task text into [`TaskOutput`] records.
///
/// Stateless apart from the client handle; clones share the client and may
/// be used from concurrent tasks.
#[derive(Clone)]
pub struct TaskProcessor {
    client: Arc<dyn CompletionClient>,
}

impl std::fmt::Debug for TaskProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskProcessor")
            .field("model", &self.client.model())
            .finish()
    }
}

impl TaskProcessor {
    /// Create a processor over an injected completion client
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Model identifier of the underlying client
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Process one task
    ///
    /// # Arguments
    /// * `input` - Validated raw task
    ///
    /// # Returns
    /// The validated record, or the first failure in summary, tags, priority
    /// order. All three calls are awaited before any failure is reported.
    pub async fn process(&self, input: &TaskInput) -> Result<TaskOutput, ProcessingError> {
        let raw_text = input.raw_text();
        let started = Instant::now();

        debug!(task = %preview(raw_text, 40), model = %self.model(), "Processing task");

        let (summary, tags, priority) = tokio::join!(
            self.complete(Extraction::Summary, raw_text),
            self.complete(Extraction::Tags, raw_text),
            self.complete(Extraction::Priority, raw_text),
        );
        let (summary, tags, priority) = (summary?, tags?, priority?);

        let normalized = normalize(&summary, &tags, &priority)?;
        let tags = parse_tags(normalized.tags.as_slice())?;
        let priority: Priority = normalized.priority.priority.parse()?;
        let elapsed_ms = round_ms(started.elapsed().as_secs_f64() * 1000.0);

        let output = TaskOutput::new(
            normalized.summary,
            tags,
            priority,
            raw_text,
            Some(normalized.priority.confidence),
            Some(elapsed_ms),
        )?;

        debug!(
            task = %preview(raw_text, 40),
            priority = %output.priority(),
            elapsed_ms,
            "Task processed"
        );

        Ok(output)
    }

    async fn complete(&self, call: Extraction, raw_text: &str) -> Result<String, ProcessingError> {
        let prompt = prompts::render(call, raw_text);
        self.client
            .complete(&prompt)
            .await
            .map_err(|source| {
                debug!(call = %call, error = %source, "Completion failed");
                ProcessingError::Provider { call, source }
            })
    }
}

/// Round milliseconds to two decimal places.
pub(crate) fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_ms() {
        assert_eq!(round_ms(12.3456), 12.35);
        assert_eq!(round_ms(0.004), 0.0);
        assert_eq!(round_ms(100.0), 100.0);
    }
}
