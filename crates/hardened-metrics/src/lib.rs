//! Rolling request-outcome metrics for hardened-fetch.
//!
//! A [`MetricsCollector`] keeps an append-only log of [`RequestOutcome`]s and
//! derives [`Metrics`] and a [`HealthStatus`] from the outcomes that started
//! inside a trailing observation window (5 minutes by default).
//!
//! The collector is a cheap handle: clones share one log, which is how the
//! retry executor and the health report see the same data.
//!
//! # Examples
//!
//! ```
//! use hardened_metrics::{HealthStatus, MetricsCollector, RequestOutcome};
//! use tokio::time::Instant;
//!
//! let collector = MetricsCollector::new();
//! let now = Instant::now();
//! collector.record(RequestOutcome::success(now, now, 0));
//! collector.record(RequestOutcome::failure(now, now, "HTTP 500", Some(500), 3));
//!
//! let metrics = collector.snapshot();
//! assert_eq!(metrics.total_requests, 2);
//! assert_eq!(metrics.success_rate, 50.0);
//! assert_eq!(collector.health_status(), HealthStatus::Unhealthy);
//! ```

mod outcome;
mod snapshot;

pub use outcome::RequestOutcome;
pub use snapshot::{HealthStatus, Metrics, DEGRADED_ABOVE, HEALTHY_ABOVE};

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter, describe_histogram, histogram};

#[cfg(feature = "tracing")]
use tracing::debug;

/// Default length of the observation window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Configuration for a [`MetricsCollector`].
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub(crate) window: Duration,
    pub(crate) name: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            name: "<unnamed>".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Starts a builder with the defaults.
    pub fn builder() -> MetricsConfigBuilder {
        MetricsConfigBuilder::new()
    }

    /// Length of the observation window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Instance name used in logs and metric labels.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`MetricsConfig`].
#[derive(Debug, Default)]
pub struct MetricsConfigBuilder {
    config: MetricsConfig,
}

impl MetricsConfigBuilder {
    /// Creates a builder with a 5 minute window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the observation window.
    pub fn window(mut self, window: Duration) -> Self {
        self.config.window = window;
        self
    }

    /// Sets the instance name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Builds a collector with this configuration.
    pub fn build(self) -> MetricsCollector {
        MetricsCollector::with_config(self.config)
    }
}

struct Inner {
    config: MetricsConfig,
    log: Mutex<VecDeque<RequestOutcome>>,
}

/// Shared, thread-safe outcome log.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsCollector")
            .field("name", &self.inner.config.name)
            .field("window", &self.inner.config.window)
            .field("recorded", &self.inner.log.lock().len())
            .finish()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Creates a collector with the default 5 minute window.
    pub fn new() -> Self {
        Self::with_config(MetricsConfig::default())
    }

    /// Creates a collector from an explicit configuration.
    pub fn with_config(config: MetricsConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            describe_counter!(
                "hardened_requests_total",
                "Top-level outbound calls by result (success, failure, cancelled)"
            );
            describe_histogram!(
                "hardened_request_duration_seconds",
                "Wall time of top-level outbound calls including retries"
            );
        }

        Self {
            inner: Arc::new(Inner {
                config,
                log: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// The collector's configuration.
    pub fn config(&self) -> &MetricsConfig {
        &self.inner.config
    }

    /// Appends an outcome and drops outcomes that have left the window.
    pub fn record(&self, outcome: RequestOutcome) {
        #[cfg(feature = "metrics")]
        {
            let result = if outcome.succeeded {
                "success"
            } else if outcome.cancelled {
                "cancelled"
            } else {
                "failure"
            };
            counter!("hardened_requests_total", "client" => self.inner.config.name.clone(), "result" => result)
                .increment(1);
            histogram!("hardened_request_duration_seconds", "client" => self.inner.config.name.clone())
                .record(outcome.latency().as_secs_f64());
        }

        #[cfg(feature = "tracing")]
        debug!(
            collector = %self.inner.config.name,
            succeeded = outcome.succeeded,
            retry_count = outcome.retry_count,
            latency_ms = outcome.latency().as_millis() as u64,
            "Request outcome recorded"
        );

        let window = self.inner.config.window;
        let now = Instant::now();
        let mut log = self.inner.log.lock();
        log.push_back(outcome);
        // Front-only pruning; concurrent calls may record slightly out of
        // start order, so `snapshot` still filters.
        while log
            .front()
            .is_some_and(|o| now.saturating_duration_since(o.started_at) >= window)
        {
            log.pop_front();
        }
    }

    /// Aggregates the outcomes that started less than one window ago.
    pub fn snapshot(&self) -> Metrics {
        let window = self.inner.config.window;
        let now = Instant::now();
        let log = self.inner.log.lock();
        Metrics::from_outcomes(
            log.iter()
                .filter(|o| now.saturating_duration_since(o.started_at) < window),
        )
    }

    /// Health derived from the current snapshot.
    pub fn health_status(&self) -> HealthStatus {
        self.snapshot().health_status()
    }

    /// Number of outcomes currently held, including stale ones not yet pruned.
    pub fn len(&self) -> usize {
        self.inner.log.lock().len()
    }

    /// Returns `true` if nothing has been recorded since the last reset.
    pub fn is_empty(&self) -> bool {
        self.inner.log.lock().is_empty()
    }

    /// Forgets every recorded outcome.
    pub fn reset(&self) {
        self.inner.log.lock().clear();
    }
}
