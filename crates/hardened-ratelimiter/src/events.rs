use hardened_core::FetchEvent;
use std::time::Instant;

/// Events emitted by a [`RateLimiter`](crate::RateLimiter).
#[derive(Debug, Clone)]
pub enum RateLimiterEvent {
    /// A call was admitted into an open window.
    Admitted {
        limiter_name: String,
        timestamp: Instant,
        identifier: String,
    },
    /// A call was denied because the window is full.
    Rejected {
        limiter_name: String,
        timestamp: Instant,
        identifier: String,
    },
    /// A call opened a fresh window for its identifier.
    WindowReset {
        limiter_name: String,
        timestamp: Instant,
        identifier: String,
    },
}

impl RateLimiterEvent {
    pub fn identifier(&self) -> &str {
        match self {
            RateLimiterEvent::Admitted { identifier, .. }
            | RateLimiterEvent::Rejected { identifier, .. }
            | RateLimiterEvent::WindowReset { identifier, .. } => identifier,
        }
    }
}

impl FetchEvent for RateLimiterEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RateLimiterEvent::Admitted { .. } => "admitted",
            RateLimiterEvent::Rejected { .. } => "rejected",
            RateLimiterEvent::WindowReset { .. } => "window_reset",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RateLimiterEvent::Admitted { timestamp, .. }
            | RateLimiterEvent::Rejected { timestamp, .. }
            | RateLimiterEvent::WindowReset { timestamp, .. } => *timestamp,
        }
    }

    fn component(&self) -> &str {
        match self {
            RateLimiterEvent::Admitted { limiter_name, .. }
            | RateLimiterEvent::Rejected { limiter_name, .. }
            | RateLimiterEvent::WindowReset { limiter_name, .. } => limiter_name,
        }
    }
}
