use std::time::Duration;

/// Backoff parameters for one retrying call.
///
/// Immutable once built; pass a different config to
/// [`RetryExecutor::execute_with`](crate::RetryExecutor::execute_with) to
/// override the executor default for a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub(crate) max_retries: usize,
    pub(crate) base_delay: Duration,
    pub(crate) max_delay: Duration,
    pub(crate) backoff_multiplier: f64,
    pub(crate) max_jitter: Duration,
}

impl Default for RetryConfig {
    /// 3 retries, 1s base delay doubling up to 10s, plus up to 100ms jitter.
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
            max_jitter: Duration::from_millis(100),
        }
    }
}

impl RetryConfig {
    /// Starts a builder from the defaults.
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Retries allowed after the first attempt.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Delay before the first retry.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Cap on the exponential delay, jitter excluded.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Growth factor applied per retry; at least 1.0.
    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// Exclusive bound of the random jitter.
    pub fn max_jitter(&self) -> Duration {
        self.max_jitter
    }
}

/// Builder for [`RetryConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetryConfigBuilder {
    pub(crate) config: RetryConfig,
}

impl RetryConfigBuilder {
    /// Creates a builder with the defaults of [`RetryConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many times a failed call may be retried.
    ///
    /// `max_retries(2)` means at most 3 calls in total.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Delay before the first retry, before jitter.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.base_delay = delay;
        self
    }

    /// Upper bound on the exponential part of the delay.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    /// Growth factor applied per attempt.
    ///
    /// Values below 1.0 are raised to 1.0.
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.config.backoff_multiplier = if multiplier.is_finite() {
            multiplier.max(1.0)
        } else {
            1.0
        };
        self
    }

    /// Exclusive upper bound of the uniform jitter added to every delay.
    pub fn max_jitter(mut self, jitter: Duration) -> Self {
        self.config.max_jitter = jitter;
        self
    }

    /// Finishes the config.
    pub fn build(self) -> RetryConfig {
        self.config
    }
}
