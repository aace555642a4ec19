use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Each delay is this many times the previous one, up to `max_delay_ms`.
const BACKOFF_MULTIPLIER: u64 = 2;

/// How often, and how patiently, a failed connection attempt is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Attempts after the first one
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    /// Un-jittered delay before retry number `retry` (1-based).
    fn base_delay(&self, retry: u32) -> u64 {
        let factor = BACKOFF_MULTIPLIER.saturating_pow(retry.saturating_sub(1));
        self.initial_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
        }
    }
}

/// Run `operation` until it succeeds or the retries in `config` run out.
/// The final error is returned as is.
pub async fn retry_with_backoff<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retry = 0;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if retry > 0 {
                    debug!(retries = retry, "Succeeded after retrying");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if retry >= config.max_retries {
            warn!(attempts = retry + 1, error = %error, "Giving up");
            return Err(error);
        }
        retry += 1;

        let wait_ms = jitter(config.base_delay(retry));
        debug!(retry, max_retries = config.max_retries, wait_ms, error = %error, "Attempt failed, retrying");
        tokio::time::sleep(Duration::from_millis(wait_ms)).await;
    }
}

/// Scale `delay_ms` by a pseudo-random factor in [0.5, 1.0].
fn jitter(delay_ms: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let percent = 50 + RandomState::new().hash_one(std::time::SystemTime::now()) % 51;
    delay_ms * percent / 100
}
