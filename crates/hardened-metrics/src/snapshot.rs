use crate::outcome::RequestOutcome;
use serde::Serialize;
use std::fmt;

/// Success rate a collector must exceed to report [`HealthStatus::Healthy`].
pub const HEALTHY_ABOVE: f64 = 95.0;

/// Success rate a collector must exceed to report [`HealthStatus::Degraded`].
pub const DEGRADED_ABOVE: f64 = 80.0;

/// Aggregates over the outcomes inside the observation window.
///
/// Rates are percentages in `0.0..=100.0`; latency is in milliseconds. Every
/// field is zero when the window is empty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_requests: usize,
    pub success_rate: f64,
    pub average_latency: f64,
    pub error_rate: f64,
    pub retry_rate: f64,
    pub cancelled_requests: usize,
}

impl Metrics {
    pub(crate) fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a RequestOutcome>,
    {
        let mut total = 0usize;
        let mut succeeded = 0usize;
        let mut retried = 0usize;
        let mut cancelled = 0usize;
        let mut latency_ms = 0.0;

        for outcome in outcomes {
            total += 1;
            if outcome.succeeded {
                succeeded += 1;
            }
            if outcome.retry_count > 0 {
                retried += 1;
            }
            if outcome.cancelled {
                cancelled += 1;
            }
            latency_ms += outcome.latency().as_secs_f64() * 1000.0;
        }

        if total == 0 {
            return Metrics::default();
        }

        let total_f = total as f64;
        let success_rate = succeeded as f64 * 100.0 / total_f;
        Metrics {
            total_requests: total,
            success_rate,
            average_latency: latency_ms / total_f,
            error_rate: (total - succeeded) as f64 * 100.0 / total_f,
            retry_rate: retried as f64 * 100.0 / total_f,
            cancelled_requests: cancelled,
        }
    }

    /// Health implied by [`Metrics::success_rate`].
    ///
    /// An empty window has a success rate of 0 and is therefore unhealthy;
    /// callers that want "no data yet" semantics check `total_requests == 0`.
    pub fn health_status(&self) -> HealthStatus {
        HealthStatus::from_success_rate(self.success_rate)
    }
}

/// Coarse health derived from the rolling success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Success rate above 95%.
    Healthy,
    /// Success rate above 80%.
    Degraded,
    /// Everything else, including an empty window.
    Unhealthy,
}

impl HealthStatus {
    /// Maps a success-rate percentage onto a status.
    pub fn from_success_rate(success_rate: f64) -> Self {
        if success_rate > HEALTHY_ABOVE {
            HealthStatus::Healthy
        } else if success_rate > DEGRADED_ABOVE {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        }
    }

    /// Healthy or degraded.
    pub fn is_usable(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
