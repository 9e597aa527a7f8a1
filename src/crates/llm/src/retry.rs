//! Bounded retry of transient completion failures.
//!
//! Only errors for which [`crate::LlmError::is_retryable`] holds are retried;
//! anything else is handed back on first sight. Delays double from
//! `initial_backoff` up to `max_backoff`.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How often and how patiently a request is retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt (total attempts = `max_retries + 1`)
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Stretch each delay by a random 0-25%
    pub jitter: bool,
}

impl RetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(20),
            jitter: true,
        }
    }

    pub fn with_initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = delay;
        self
    }

    pub fn with_max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Sleep before retry number `retry` (0 = first retry).
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let doubled = self
            .initial_backoff
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.max_backoff);

        if self.jitter {
            doubled.mul_f64(1.0 + 0.25 * rand::random::<f64>())
        } else {
            doubled
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Run `op` until it succeeds, fails permanently, or the retry budget is spent.
///
/// `label` only appears in log lines.
pub async fn retry_with_backoff<F, Fut, T>(
    config: &RetryConfig,
    label: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retry = 0;
    loop {
        let err = match op().await {
            Ok(value) => {
                if retry > 0 {
                    info!(call = label, retries = retry, "Request recovered");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !err.is_retryable() {
            debug!(call = label, error = %err, "Permanent failure");
            return Err(err);
        }
        if retry == config.max_retries {
            warn!(call = label, attempts = retry + 1, error = %err, "Giving up");
            return Err(err);
        }

        let delay = config.backoff_delay(retry);
        warn!(
            call = label,
            attempt = retry + 1,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Transient failure, backing off"
        );
        tokio::time::sleep(delay).await;
        retry += 1;
    }
}
