//! Bounded retry with exponential backoff for remote calls.

use std::time::Duration;

use orchid_core::Config;

use crate::error::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first.
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: config.retry_backoff(),
        }
    }

    /// Run `attempt` until it succeeds, fails permanently, or retries run out.
    pub(crate) fn run<F>(&self, url: &str, mut attempt: F) -> Result<ureq::Response, RemoteError>
    where
        F: FnMut() -> Result<ureq::Response, ureq::Error>,
    {
        let mut delay = self.initial_backoff;
        let mut retries = 0;
        loop {
            let err = match attempt() {
                Ok(response) => return Ok(response),
                Err(err) => RemoteError::from_ureq(url, err),
            };
            if retries >= self.max_retries || !err.is_retryable() {
                return Err(err);
            }
            retries += 1;
            tracing::warn!(url, retry = retries, error = %err, "remote call failed, retrying");
            std::thread::sleep(delay);
            delay = delay.saturating_mul(2);
        }
    }
}
