//! Delay computation.

use crate::RetryConfig;
use rand::Rng;
use std::time::Duration;

impl RetryConfig {
    /// The deterministic part of the delay after failed attempt `attempt`
    /// (0-indexed): `min(base_delay * multiplier^attempt, max_delay)`.
    pub fn capped_delay(&self, attempt: usize) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        match Duration::try_from_secs_f64(secs) {
            Ok(delay) => delay.min(self.max_delay),
            Err(_) => self.max_delay,
        }
    }

    /// Full delay: [`capped_delay`](Self::capped_delay) plus uniform jitter
    /// in `[0, max_jitter)`.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        self.capped_delay(attempt) + jitter(self.max_jitter)
    }
}

fn jitter(max: Duration) -> Duration {
    let max_nanos = u64::try_from(max.as_nanos()).unwrap_or(u64::MAX);
    if max_nanos == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(rand::rng().random_range(0..max_nanos))
}
