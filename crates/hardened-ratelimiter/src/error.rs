use hardened_core::FetchError;
use thiserror::Error;

/// Errors returned by [`RateLimiter::try_acquire`](crate::RateLimiter::try_acquire).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimiterError {
    /// The identifier has used its whole budget for the current window.
    #[error("Rate limit exceeded for {identifier}")]
    RateLimitExceeded { identifier: String },
}

impl From<RateLimiterError> for FetchError {
    fn from(err: RateLimiterError) -> Self {
        match err {
            RateLimiterError::RateLimitExceeded { identifier } => {
                FetchError::RateLimited { identifier }
            }
        }
    }
}
