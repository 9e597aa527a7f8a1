//! Groq client implementation.
//!
//! Groq serves an OpenAI-compatible chat-completions API. Each prompt is sent
//! as a single user message and the first choice's text is returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::{CompletionClient, CompletionConfig};
//! use llm::remote::GroqClient;
//!
//! let config = CompletionConfig::from_lookup("GROQ_API_KEY", |k| std::env::var(k).ok())?;
//! let client = GroqClient::new(config)?;
//!
//! let text = client.complete("Say hello in one word").await?;
//! ```

use crate::config::CompletionConfig;
use crate::error::{LlmError, Result};
use crate::retry::{retry_with_backoff, RetryConfig};
use crate::CompletionClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Groq API client.
#[derive(Clone)]
pub struct GroqClient {
    config: CompletionConfig,
    retry: RetryConfig,
    client: Client,
}

impl GroqClient {
    /// Create a new Groq client with the given configuration.
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;
        let retry = config.retry_config();

        Ok(Self {
            config,
            retry,
            client,
        })
    }

    fn build_request(&self, prompt: &str) -> GroqRequest {
        GroqRequest {
            model: self.config.model.clone(),
            messages: vec![GroqMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
            stream: false,
        }
    }

    /// Execute a single request without retry.
    async fn send_once(&self, request: &GroqRequest) -> Result<String> {
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status.as_u16(), error_text));
        }

        let groq_resp: GroqResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                LlmError::InvalidResponse(e.to_string())
            } else {
                self.transport_error(e)
            }
        })?;

        extract_text(groq_resp)
    }

    /// Classify a reqwest failure that happened before a full body arrived.
    ///
    /// Timeouts and connection trouble are transient. A request reqwest could
    /// not even build (bad URL, bad header) fails the same way every time.
    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(format!("no response within {:?}", self.config.timeout))
        } else if e.is_builder() {
            LlmError::InvalidRequest(e.to_string())
        } else {
            LlmError::HttpError(e)
        }
    }
}

/// First choice's message text.
fn extract_text(response: GroqResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = self.build_request(prompt);
        let started = Instant::now();

        let text =
            retry_with_backoff(&self.retry, "groq.complete", || self.send_once(&request)).await?;

        debug!(
            model = %self.config.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = text.len(),
            "Completion received"
        );
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// Groq API types (OpenAI-compatible)
#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
}

#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GroqClient::new(CompletionConfig::new("test-key")).unwrap();
        assert_eq!(client.model(), crate::config::DEFAULT_MODEL);
        assert_eq!(client.retry.max_retries, 3);
    }

    #[test]
    fn test_request_shape() {
        let client = GroqClient::new(CompletionConfig::new("test-key")).unwrap();
        let request = client.build_request("Tags:");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "llama3-70b-8192");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Tags:");
        assert_eq!(body["stream"], false);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_extract_text() {
        let resp: GroqResponse = serde_json::from_str(
            r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "[\"work\"]"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(resp).unwrap(), "[\"work\"]");

        let empty: GroqResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(extract_text(empty), Err(LlmError::InvalidResponse(_))));
    }
}
