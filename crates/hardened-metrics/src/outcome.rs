use std::time::Duration;
use tokio::time::Instant;

/// The result of one top-level call, including all of its retries.
///
/// Outcomes are immutable once recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    /// When the first attempt started.
    pub started_at: Instant,
    /// When the call returned to its caller.
    pub ended_at: Instant,
    /// Whether the call produced a value.
    pub succeeded: bool,
    /// Display text of the final failure.
    pub error_message: Option<String>,
    /// HTTP status of the final failure, if it had one.
    pub status_code: Option<u16>,
    /// Retries performed (attempts minus one on success).
    pub retry_count: usize,
    /// Set when the caller cancelled the call.
    pub cancelled: bool,
}

impl RequestOutcome {
    /// A successful call that needed `retry_count` retries.
    pub fn success(started_at: Instant, ended_at: Instant, retry_count: usize) -> Self {
        Self {
            started_at,
            ended_at,
            succeeded: true,
            error_message: None,
            status_code: None,
            retry_count,
            cancelled: false,
        }
    }

    /// A failed call.
    pub fn failure(
        started_at: Instant,
        ended_at: Instant,
        error_message: impl Into<String>,
        status_code: Option<u16>,
        retry_count: usize,
    ) -> Self {
        Self {
            started_at,
            ended_at,
            succeeded: false,
            error_message: Some(error_message.into()),
            status_code,
            retry_count,
            cancelled: false,
        }
    }

    /// Marks the outcome as a caller cancellation.
    pub fn cancelled(mut self) -> Self {
        self.cancelled = true;
        self
    }

    /// Wall time spent on the call.
    pub fn latency(&self) -> Duration {
        self.ended_at.saturating_duration_since(self.started_at)
    }
}
