//! Common test utilities: a scripted completion client

#![allow(dead_code)]

use async_trait::async_trait;
use llm::{CompletionClient, LlmError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tasknorm::Extraction;

pub const GOOD_SUMMARY: &str = "Schedule a call with Bob on Thursday to review the Q3 deck";

type Responder = Arc<dyn Fn(&str) -> llm::Result<String> + Send + Sync>;

/// Fake client that answers each extraction call from a script.
///
/// Calls are routed by prompt wording; responders receive the task text.
pub struct ScriptedClient {
    summary: Responder,
    tags: Responder,
    priority: Responder,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedClient {
    /// A client whose answers always validate.
    pub fn happy() -> Self {
        Self {
            summary: text(&format!("\"{}\"", GOOD_SUMMARY)),
            tags: text(r#"["Work", "communication"]"#),
            priority: text(r#"{"priority": "High", "confidence": 0.9}"#),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_summary(
        mut self,
        f: impl Fn(&str) -> llm::Result<String> + Send + Sync + 'static,
    ) -> Self {
        self.summary = Arc::new(f);
        self
    }

    pub fn with_tags(
        mut self,
        f: impl Fn(&str) -> llm::Result<String> + Send + Sync + 'static,
    ) -> Self {
        self.tags = Arc::new(f);
        self
    }

    pub fn with_priority(
        mut self,
        f: impl Fn(&str) -> llm::Result<String> + Send + Sync + 'static,
    ) -> Self {
        self.priority = Arc::new(f);
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> llm::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let task = task_text(prompt);
        let reply = match route(prompt) {
            Extraction::Summary => (self.summary)(task),
            Extraction::Tags => (self.tags)(task),
            Extraction::Priority => (self.priority)(task),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Responder returning the same text every time.
pub fn text(reply: &str) -> Responder {
    let reply = reply.to_string();
    Arc::new(move |_| Ok(reply.clone()))
}

pub fn rate_limited(_task: &str) -> llm::Result<String> {
    Err(LlmError::RateLimitExceeded("retries exhausted".into()))
}

fn route(prompt: &str) -> Extraction {
    if prompt.contains("actionable summary") {
        Extraction::Summary
    } else if prompt.contains("Classify this task") {
        Extraction::Tags
    } else {
        Extraction::Priority
    }
}

/// The text after the last `Task: ` marker, up to the end of that line.
fn task_text(prompt: &str) -> &str {
    prompt
        .rsplit_once("Task: ")
        .map(|(_, rest)| rest.lines().next().unwrap_or(""))
        .unwrap_or("")
}
