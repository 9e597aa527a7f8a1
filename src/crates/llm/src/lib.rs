//! Text-completion client for tasknorm.
//!
//! This crate wraps a hosted LLM behind the [`CompletionClient`] trait: one
//! rendered prompt in, raw completion text out. It owns transport concerns
//! only (request timeout, retry of transient failures, HTTP error
//! classification) and knows nothing about what the prompt means.
//!
//! # Providers
//!
//! - **Groq** - OpenAI-compatible API at `https://api.groq.com/openai/v1`
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use llm::{parse_json_output, CompletionClient, CompletionConfig};
//! use llm::remote::GroqClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CompletionConfig::from_lookup("GROQ_API_KEY", |k| std::env::var(k).ok())?;
//!     let client = GroqClient::new(config)?;
//!
//!     let text = client.complete("Respond with a JSON array of two colors").await?;
//!     let value = parse_json_output(&text)?;
//!     println!("{}", value);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod remote;
pub mod retry;

use async_trait::async_trait;
use std::sync::Arc;

// Re-export commonly used types
pub use config::CompletionConfig;
pub use error::{LlmError, Result};
pub use output::parse_json_output;
pub use retry::RetryConfig;

/// A text-completion service.
///
/// Implementations must be `Send + Sync` so a single client can serve
/// concurrent requests. Each call is one independent exchange; nothing is
/// cached between calls.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one prompt and return the model's raw text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier used for requests.
    fn model(&self) -> &str;
}

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}
