//! Batch processing of task lines with a bounded worker pool.
//!
//! Each line is validated and processed on its own; a failing line is
//! recorded and never aborts its siblings. Results come back in input order.

use crate::error::Error;
use crate::processor::TaskProcessor;
use crate::schema::{TaskInput, TaskOutput};
use crate::text::preview;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Default number of tasks processed at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Split pasted text into task lines.
///
/// Lines are trimmed and blank ones dropped. Each entry carries its 1-based
/// line number in the original text.
pub fn parse_task_lines(text: &str) -> Vec<(usize, String)> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.trim();
            (!line.is_empty()).then(|| (idx + 1, line.to_string()))
        })
        .collect()
}

/// Outcome for one input line.
#[derive(Debug)]
pub struct BatchItem {
    pub line: usize,
    pub raw_text: String,
    pub outcome: Result<TaskOutput, Error>,
}

impl BatchItem {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// All outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn outputs(&self) -> Vec<&TaskOutput> {
        self.items.iter().filter_map(|i| i.outcome.as_ref().ok()).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&BatchItem, &Error)> {
        self.items
            .iter()
            .filter_map(|i| i.outcome.as_ref().err().map(|e| (i, e)))
    }

    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.items.len() - self.success_count()
    }

    /// True when there was at least one line and none succeeded.
    pub fn all_failed(&self) -> bool {
        !self.items.is_empty() && self.success_count() == 0
    }

    /// Consume the report, keeping only successful records.
    pub fn into_outputs(self) -> Vec<TaskOutput> {
        self.items.into_iter().filter_map(|i| i.outcome.ok()).collect()
    }
}

/// Runs a [`TaskProcessor`] over many lines, at most `concurrency` at a time.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    processor: TaskProcessor,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(processor: TaskProcessor) -> Self {
        Self {
            processor,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the worker pool size (clamped to at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn run(&self, lines: Vec<(usize, String)>) -> BatchReport {
        self.run_with_progress(lines, |_| {}).await
    }

    /// Process every line, calling `on_done` as each one finishes
    ///
    /// `on_done` runs in completion order; the report is in input order.
    pub async fn run_with_progress<F>(&self, lines: Vec<(usize, String)>, on_done: F) -> BatchReport
    where
        F: Fn(&BatchItem),
    {
        let total = lines.len();
        let semaphore = Semaphore::new(self.concurrency);

        info!(tasks = total, concurrency = self.concurrency, "Starting batch");

        let futures = lines.into_iter().map(|(line, raw_text)| {
            let semaphore = &semaphore;
            let on_done = &on_done;
            async move {
                // Input validation happens before taking a slot
                let outcome = match TaskInput::new(raw_text.as_str()) {
                    Ok(input) => {
                        let _permit = semaphore.acquire().await.ok();
                        self.processor.process(&input).await.map_err(Error::from)
                    }
                    Err(e) => Err(Error::from(e)),
                };

                if let Err(e) = &outcome {
                    warn!(line, task = %preview(&raw_text, 50), error = %e, "Task failed");
                }

                let item = BatchItem {
                    line,
                    raw_text,
                    outcome,
                };
                on_done(&item);
                item
            }
        });

        let report = BatchReport {
            items: join_all(futures).await,
        };

        info!(
            succeeded = report.success_count(),
            failed = report.failure_count(),
            "Batch finished"
        );

        report
    }
}
