//! Configuration for completion providers.

use crate::error::{LlmError, Result};
use crate::retry::RetryConfig;
use std::fmt;
use std::time::Duration;

/// Default Groq OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Low sampling temperature keeps extraction output repeatable.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Configuration for a remote completion provider.
#[derive(Clone)]
pub struct CompletionConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API, without the `/chat/completions` suffix.
    pub base_url: String,

    /// Model name/identifier.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Maximum retries for transient failures (attempts = retries + 1).
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each further retry.
    pub initial_backoff: Duration,
}

impl CompletionConfig {
    /// Create a configuration with default endpoint, model and limits.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: default_timeout(),
            max_retries: default_max_retries(),
            initial_backoff: Duration::from_millis(500),
        }
    }

    /// Create configuration with the key read from `var` through `lookup`.
    ///
    /// A missing or blank key is an error so a bad setup fails at startup
    /// instead of as a 401 halfway through a batch.
    pub fn from_lookup<F>(var: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(var)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| LlmError::ApiKeyNotFound(format!("variable {}", var)))?;

        Ok(Self::new(api_key))
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Retry policy derived from this configuration.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_retries).with_initial_backoff(self.initial_backoff)
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("initial_backoff", &self.initial_backoff)
            .finish()
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompletionConfig::new("test-key");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_builder() {
        let config = CompletionConfig::new("test-key")
            .with_base_url("http://localhost:9999/v1/")
            .with_model("llama-3.1-8b-instant")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(1);

        assert_eq!(config.completions_url(), "http://localhost:9999/v1/chat/completions");
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry_config().max_retries, 1);
    }

    #[test]
    fn test_from_lookup_missing() {
        let result = CompletionConfig::from_lookup("GROQ_API_KEY", |_| None);
        assert!(matches!(result, Err(LlmError::ApiKeyNotFound(_))));
    }

    #[test]
    fn test_from_lookup_blank() {
        let result = CompletionConfig::from_lookup("GROQ_API_KEY", |_| Some("   ".to_string()));
        assert!(result.unwrap_err().is_auth_error());
    }

    #[test]
    fn test_from_lookup_trims_key() {
        let config =
            CompletionConfig::from_lookup("GROQ_API_KEY", |_| Some(" gsk_abc \n".to_string()))
                .unwrap();
        assert_eq!(config.api_key, "gsk_abc");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = CompletionConfig::new("super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
