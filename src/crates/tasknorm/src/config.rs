//! Application configuration
//!
//! Loaded once at startup from the process environment (and an optional
//! `.env` file). The provider credential is required; everything else has a
//! default and can be overridden from the command line.

use crate::batch::DEFAULT_CONCURRENCY;
use crate::error::{Error, Result};
use llm::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use llm::CompletionConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const MODEL_VAR: &str = "TASKNORM_MODEL";
pub const BASE_URL_VAR: &str = "TASKNORM_BASE_URL";
pub const TIMEOUT_VAR: &str = "TASKNORM_TIMEOUT_SECS";
pub const MAX_RETRIES_VAR: &str = "TASKNORM_MAX_RETRIES";
pub const CONCURRENCY_VAR: &str = "TASKNORM_CONCURRENCY";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub concurrency: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::Config(format!("failed to read .env: {}", e))),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = CompletionConfig::from_lookup(API_KEY_VAR, &lookup)
            .map_err(|_| {
                Error::Config(format!(
                    "{} is not set; export it or add it to a .env file",
                    API_KEY_VAR
                ))
            })?
            .api_key;

        let timeout_secs = parse_var(&lookup, TIMEOUT_VAR)?.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config = Self {
            api_key,
            model: lookup(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            max_retries: parse_var(&lookup, MAX_RETRIES_VAR)?.unwrap_or(DEFAULT_MAX_RETRIES),
            concurrency: parse_var(&lookup, CONCURRENCY_VAR)?.unwrap_or(DEFAULT_CONCURRENCY),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Reject values that would make the pipeline unusable.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::Config("model must not be empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".into()));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".into()));
        }
        Ok(())
    }

    /// Client settings for the completion provider.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_timeout(self.timeout)
            .with_max_retries(self.max_retries)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("invalid {} {:?}: {}", key, raw, e))),
        None => Ok(None),
    }
}
