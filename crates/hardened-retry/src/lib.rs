//! Bounded retry executor for hardened-fetch.
//!
//! [`RetryExecutor`] runs a zero-argument async operation until it succeeds,
//! fails with a non-retryable error, or uses up its retry budget. Between
//! attempts it sleeps for a capped exponential delay plus uniform jitter:
//!
//! ```text
//! delay(attempt) = min(base_delay * multiplier^attempt, max_delay) + U[0, max_jitter)
//! ```
//!
//! Every top-level call, however many attempts it took, produces exactly one
//! [`RequestOutcome`] in the executor's [`MetricsCollector`]. Failures are
//! returned unchanged: the caller sees the last error the operation produced.
//!
//! # Examples
//!
//! ```
//! use hardened_core::FetchError;
//! use hardened_retry::RetryExecutor;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), FetchError> {
//! let executor = RetryExecutor::builder()
//!     .max_retries(2)
//!     .base_delay(Duration::from_millis(50))
//!     .on_retry(|attempt, delay| {
//!         println!("attempt {attempt} failed, retrying in {delay:?}");
//!     })
//!     .build();
//!
//! let body = executor
//!     .execute("api.example.com", || async { Ok::<_, FetchError>("quote") })
//!     .await?;
//! assert_eq!(body, "quote");
//! # Ok(())
//! # }
//! ```

mod backoff;
mod config;
mod events;

pub use config::{RetryConfig, RetryConfigBuilder};
pub use events::RetryEvent;

use hardened_core::{Cancelled, Classify, EventListeners, FnListener};
use hardened_metrics::{MetricsCollector, MetricsConfig, RequestOutcome};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

struct Shared {
    name: String,
    listeners: EventListeners<RetryEvent>,
}

/// Runs operations with bounded retries and records one outcome per call.
///
/// Cloning is cheap; clones share listeners and the metrics collector.
#[derive(Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
    metrics: MetricsCollector,
    shared: Arc<Shared>,
}

impl fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("name", &self.shared.name)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryExecutor {
    /// Starts a builder with [`RetryConfig::default`] and a fresh collector.
    pub fn builder() -> RetryExecutorBuilder {
        RetryExecutorBuilder::new()
    }

    /// The default config used by [`execute`](Self::execute).
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// The collector outcomes are recorded into.
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Executor name used in events, logs and metric labels.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Runs `operation` under the executor's default config.
    pub async fn execute<T, E, F, Fut>(&self, identifier: &str, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + fmt::Display,
    {
        self.run(&self.config, identifier, std::future::pending(), operation)
            .await
    }

    /// Runs `operation` under a per-call config.
    pub async fn execute_with<T, E, F, Fut>(
        &self,
        config: &RetryConfig,
        identifier: &str,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + fmt::Display,
    {
        self.run(config, identifier, std::future::pending(), operation)
            .await
    }

    /// Runs `operation` until it finishes or `cancel` completes.
    ///
    /// `cancel` is typically `tokio::time::sleep_until(deadline)` or a
    /// cancellation token's `cancelled()` future. When it completes, the
    /// in-flight attempt or backoff sleep is abandoned and the call fails
    /// with `E::from(Cancelled)`, which is never retried.
    pub async fn execute_until<T, E, F, Fut, C>(
        &self,
        config: &RetryConfig,
        identifier: &str,
        cancel: C,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + fmt::Display + From<Cancelled>,
        C: Future<Output = ()>,
    {
        let cancel = async move {
            cancel.await;
            E::from(Cancelled)
        };
        self.run(config, identifier, cancel, operation).await
    }

    async fn run<T, E, F, Fut, C>(
        &self,
        config: &RetryConfig,
        identifier: &str,
        cancel: C,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + fmt::Display,
        C: Future<Output = E>,
    {
        let started_at = Instant::now();
        let mut cancel = std::pin::pin!(cancel);
        let mut attempt = 0usize;

        loop {
            let result = tokio::select! {
                biased;
                error = &mut cancel => {
                    return Err(self.cancelled(started_at, identifier, attempt + 1, error));
                }
                result = operation() => result,
            };

            let error = match result {
                Ok(value) => {
                    self.succeeded(started_at, identifier, attempt);
                    return Ok(value);
                }
                Err(error) => error,
            };

            if error.is_cancellation() {
                return Err(self.cancelled(started_at, identifier, attempt + 1, error));
            }

            if !error.is_retryable() {
                self.emit(RetryEvent::NotRetryable {
                    executor: self.shared.name.clone(),
                    identifier: identifier.to_string(),
                    timestamp: std::time::Instant::now(),
                    attempts: attempt + 1,
                });
                return Err(self.failed(started_at, config, error));
            }

            if attempt >= config.max_retries {
                #[cfg(feature = "tracing")]
                warn!(
                    executor = %self.shared.name,
                    identifier,
                    attempts = attempt + 1,
                    error = %error,
                    "Retries exhausted"
                );

                self.emit(RetryEvent::Exhausted {
                    executor: self.shared.name.clone(),
                    identifier: identifier.to_string(),
                    timestamp: std::time::Instant::now(),
                    attempts: attempt + 1,
                });
                return Err(self.failed(started_at, config, error));
            }

            let delay = config.delay_for(attempt);
            self.scheduled(identifier, attempt, delay, &error);

            tokio::select! {
                biased;
                error = &mut cancel => {
                    return Err(self.cancelled(started_at, identifier, attempt + 1, error));
                }
                () = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }

    fn scheduled<E: fmt::Display>(
        &self,
        identifier: &str,
        attempt: usize,
        delay: Duration,
        error: &E,
    ) {
        #[cfg(feature = "metrics")]
        counter!("hardened_retries_total", "client" => self.shared.name.clone()).increment(1);

        #[cfg(feature = "tracing")]
        debug!(
            executor = %self.shared.name,
            identifier,
            attempt = attempt + 1,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Attempt failed, retrying after backoff"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = error;

        self.emit(RetryEvent::Retry {
            executor: self.shared.name.clone(),
            identifier: identifier.to_string(),
            timestamp: std::time::Instant::now(),
            attempt,
            delay,
        });
    }

    fn succeeded(&self, started_at: Instant, identifier: &str, attempt: usize) {
        self.metrics
            .record(RequestOutcome::success(started_at, Instant::now(), attempt));
        self.emit(RetryEvent::Success {
            executor: self.shared.name.clone(),
            identifier: identifier.to_string(),
            timestamp: std::time::Instant::now(),
            attempts: attempt + 1,
        });
    }

    // Failed outcomes report the configured budget as their retry count,
    // whether or not it was used.
    fn failed<E: Classify + fmt::Display>(
        &self,
        started_at: Instant,
        config: &RetryConfig,
        error: E,
    ) -> E {
        self.metrics.record(RequestOutcome::failure(
            started_at,
            Instant::now(),
            error.to_string(),
            error.status_code(),
            config.max_retries,
        ));
        error
    }

    fn cancelled<E: Classify + fmt::Display>(
        &self,
        started_at: Instant,
        identifier: &str,
        attempts: usize,
        error: E,
    ) -> E {
        #[cfg(feature = "tracing")]
        debug!(
            executor = %self.shared.name,
            identifier,
            attempts,
            "Call cancelled by caller"
        );

        self.metrics.record(
            RequestOutcome::failure(
                started_at,
                Instant::now(),
                error.to_string(),
                error.status_code(),
                attempts.saturating_sub(1),
            )
            .cancelled(),
        );
        self.emit(RetryEvent::Cancelled {
            executor: self.shared.name.clone(),
            identifier: identifier.to_string(),
            timestamp: std::time::Instant::now(),
            attempts,
        });
        error
    }

    fn emit(&self, event: RetryEvent) {
        if !self.shared.listeners.is_empty() {
            self.shared.listeners.emit(&event);
        }
    }
}

/// Builder for [`RetryExecutor`].
pub struct RetryExecutorBuilder {
    config: RetryConfigBuilder,
    metrics: Option<MetricsCollector>,
    listeners: EventListeners<RetryEvent>,
    name: String,
}

impl Default for RetryExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder {
    /// Creates a builder with defaults:
    /// - config: [`RetryConfig::default`]
    /// - metrics: a fresh [`MetricsCollector`]
    /// - name: `"<unnamed>"`
    pub fn new() -> Self {
        Self {
            config: RetryConfigBuilder::new(),
            metrics: None,
            listeners: EventListeners::new(),
            name: "<unnamed>".to_string(),
        }
    }

    /// Replaces the whole default config.
    pub fn config(mut self, config: RetryConfig) -> Self {
        self.config = RetryConfigBuilder { config };
        self
    }

    /// See [`RetryConfigBuilder::max_retries`].
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.config = self.config.max_retries(max_retries);
        self
    }

    /// See [`RetryConfigBuilder::base_delay`].
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config = self.config.base_delay(delay);
        self
    }

    /// See [`RetryConfigBuilder::max_delay`].
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config = self.config.max_delay(delay);
        self
    }

    /// See [`RetryConfigBuilder::backoff_multiplier`].
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.config = self.config.backoff_multiplier(multiplier);
        self
    }

    /// See [`RetryConfigBuilder::max_jitter`].
    pub fn max_jitter(mut self, jitter: Duration) -> Self {
        self.config = self.config.max_jitter(jitter);
        self
    }

    /// Records outcomes into an existing collector.
    ///
    /// Without one, the executor creates a collector under its own name.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Sets the executor name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Called before each backoff sleep with the failed 0-indexed attempt
    /// and the delay about to be slept.
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, Duration) + Send + Sync + 'static,
    {
        self.listeners.add(FnListener::new(move |event: &RetryEvent| {
            if let RetryEvent::Retry { attempt, delay, .. } = event {
                f(*attempt, *delay);
            }
        }));
        self
    }

    /// Called when a call succeeds, with the number of attempts it took.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.listeners.add(FnListener::new(move |event: &RetryEvent| {
            if let RetryEvent::Success { attempts, .. } = event {
                f(*attempts);
            }
        }));
        self
    }

    /// Called when the retry budget runs out.
    pub fn on_exhausted<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.listeners.add(FnListener::new(move |event: &RetryEvent| {
            if let RetryEvent::Exhausted { attempts, .. } = event {
                f(*attempts);
            }
        }));
        self
    }

    /// Called when a failure is returned without retrying because it is
    /// not retryable.
    pub fn on_not_retryable<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.add(FnListener::new(move |event: &RetryEvent| {
            if matches!(event, RetryEvent::NotRetryable { .. }) {
                f();
            }
        }));
        self
    }

    /// Called when a call is cancelled by its caller.
    pub fn on_cancelled<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.listeners.add(FnListener::new(move |event: &RetryEvent| {
            if let RetryEvent::Cancelled { attempts, .. } = event {
                f(*attempts);
            }
        }));
        self
    }

    /// Registers a listener for every retry event.
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&RetryEvent) + Send + Sync + 'static,
    {
        self.listeners.add(FnListener::new(f));
        self
    }

    /// Builds the executor.
    pub fn build(self) -> RetryExecutor {
        #[cfg(feature = "metrics")]
        describe_counter!(
            "hardened_retries_total",
            "Retries scheduled after a retryable failure"
        );

        let name = self.name;
        let metrics = self
            .metrics
            .unwrap_or_else(|| MetricsConfig::builder().name(name.clone()).build());

        RetryExecutor {
            config: self.config.build(),
            metrics,
            shared: Arc::new(Shared {
                name,
                listeners: self.listeners,
            }),
        }
    }
}
