use hardened_core::FetchEvent;
use std::time::{Duration, Instant};

/// Events emitted by the retry executor.
#[derive(Debug, Clone)]
pub enum RetryEvent {
    /// An attempt failed and another is scheduled after `delay`.
    Retry {
        executor: String,
        identifier: String,
        timestamp: Instant,
        /// 0-indexed attempt that just failed.
        attempt: usize,
        delay: Duration,
    },
    /// The call produced a value.
    Success {
        executor: String,
        identifier: String,
        timestamp: Instant,
        /// Total attempts made, including the first.
        attempts: usize,
    },
    /// The retry budget ran out; the last failure is returned.
    Exhausted {
        executor: String,
        identifier: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// A failure was classified as non-retryable and returned immediately.
    NotRetryable {
        executor: String,
        identifier: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// The caller cancelled the call.
    Cancelled {
        executor: String,
        identifier: String,
        timestamp: Instant,
        attempts: usize,
    },
}

impl RetryEvent {
    /// Identifier (usually the host) the call was made for.
    pub fn identifier(&self) -> &str {
        match self {
            RetryEvent::Retry { identifier, .. }
            | RetryEvent::Success { identifier, .. }
            | RetryEvent::Exhausted { identifier, .. }
            | RetryEvent::NotRetryable { identifier, .. }
            | RetryEvent::Cancelled { identifier, .. } => identifier,
        }
    }
}

impl FetchEvent for RetryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RetryEvent::Retry { .. } => "retry",
            RetryEvent::Success { .. } => "success",
            RetryEvent::Exhausted { .. } => "exhausted",
            RetryEvent::NotRetryable { .. } => "not_retryable",
            RetryEvent::Cancelled { .. } => "cancelled",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RetryEvent::Retry { timestamp, .. }
            | RetryEvent::Success { timestamp, .. }
            | RetryEvent::Exhausted { timestamp, .. }
            | RetryEvent::NotRetryable { timestamp, .. }
            | RetryEvent::Cancelled { timestamp, .. } => *timestamp,
        }
    }

    fn component(&self) -> &str {
        match self {
            RetryEvent::Retry { executor, .. }
            | RetryEvent::Success { executor, .. }
            | RetryEvent::Exhausted { executor, .. }
            | RetryEvent::NotRetryable { executor, .. }
            | RetryEvent::Cancelled { executor, .. } => executor,
        }
    }
}
