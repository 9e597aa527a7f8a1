//! Error types for completion providers.

use thiserror::Error;

/// Result type for completion operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when talking to a completion provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed before a response arrived (connect, DNS, reset).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// API key not found in environment.
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// Model not found or unavailable.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Provider service unavailable (5xx).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response body could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Completion text was expected to carry JSON but did not.
    #[error("Malformed JSON output: {0}")]
    MalformedJson(String),

    /// Request timeout.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// General provider error.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Check if this error is retryable.
    ///
    /// Only transport failures, timeouts, rate limits and server-side
    /// outages qualify. Everything else is permanent for the request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::HttpError(_)
                | LlmError::ServiceUnavailable(_)
                | LlmError::Timeout(_)
                | LlmError::RateLimitExceeded(_)
        )
    }

    /// Check if this error is due to authentication.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            LlmError::AuthenticationError(_) | LlmError::ApiKeyNotFound(_)
        )
    }

    /// Map a non-success HTTP status and body to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => LlmError::AuthenticationError(body),
            404 => LlmError::ModelNotFound(body),
            408 => LlmError::Timeout(body),
            429 => LlmError::RateLimitExceeded(body),
            400 | 413 | 422 => LlmError::InvalidRequest(body),
            500..=599 => LlmError::ServiceUnavailable(format!("status {}: {}", status, body)),
            _ => LlmError::ProviderError(format!("status {}: {}", status, body)),
        }
    }
}
