use std::time::Duration;
use tokio::time::sleep;

/// Retry configuration with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 250,
            max_delay_ms: 5000,
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    /// Config allowing `retries` additional attempts after the first
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_attempts: retries + 1,
            ..Default::default()
        }
    }

    /// Execute a function with retries and exponential backoff.
    ///
    /// Errors for which `is_retryable` returns false are returned at once.
    pub async fn execute<F, Fut, T, E>(&self, is_retryable: impl Fn(&E) -> bool, mut func: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        let mut delay_ms = self.initial_delay_ms;

        loop {
            match func().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;

                    if !is_retryable(&e) {
                        return Err(e);
                    }

                    if attempt >= self.max_attempts {
                        tracing::warn!("Max attempts ({}) exceeded", self.max_attempts);
                        return Err(e);
                    }

                    tracing::debug!(
                        "Attempt {} failed, retrying in {}ms: {}",
                        attempt,
                        delay_ms,
                        e
                    );

                    sleep(Duration::from_millis(delay_ms)).await;

                    // Exponential backoff with cap
                    delay_ms = ((delay_ms as f64 * self.backoff_factor) as u64).min(self.max_delay_ms);
                }
            }
        }
    }
}
