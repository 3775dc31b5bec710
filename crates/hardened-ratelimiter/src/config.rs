use crate::events::RateLimiterEvent;
use crate::RateLimiter;
use hardened_core::{EventListeners, FnListener};
use std::time::Duration;

/// Default calls allowed per identifier per window.
pub const DEFAULT_LIMIT: usize = 60;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Configuration for the rate limiter.
pub struct RateLimiterConfig {
    pub(crate) limit: usize,
    pub(crate) window: Duration,
    pub(crate) event_listeners: EventListeners<RateLimiterEvent>,
    pub(crate) name: String,
}

impl RateLimiterConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RateLimiterConfigBuilder {
        RateLimiterConfigBuilder::new()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        RateLimiterConfigBuilder::new().into_config()
    }
}

/// Builder for configuring and constructing a rate limiter.
pub struct RateLimiterConfigBuilder {
    limit: usize,
    window: Duration,
    event_listeners: EventListeners<RateLimiterEvent>,
    name: String,
}

impl RateLimiterConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            window: DEFAULT_WINDOW,
            event_listeners: EventListeners::new(),
            name: String::from("<unnamed>"),
        }
    }

    /// Sets the number of calls allowed per identifier per window.
    ///
    /// Values below 1 are raised to 1. Default: 60
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Sets the window length.
    ///
    /// Default: 60 seconds
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Sets the name of this rate limiter for observability.
    ///
    /// Default: `"<unnamed>"`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked with the identifier of each admitted
    /// call, including calls that open a new window.
    pub fn on_admitted<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(FnListener::new(move |event: &RateLimiterEvent| match event {
                RateLimiterEvent::Admitted { identifier, .. }
                | RateLimiterEvent::WindowReset { identifier, .. } => f(identifier),
                RateLimiterEvent::Rejected { .. } => {}
            }));
        self
    }

    /// Registers a callback invoked with the identifier of each denied call.
    pub fn on_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(FnListener::new(move |event: &RateLimiterEvent| {
                if let RateLimiterEvent::Rejected { identifier, .. } = event {
                    f(identifier);
                }
            }));
        self
    }

    /// Registers a callback invoked when a call opens a fresh window.
    pub fn on_window_reset<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(FnListener::new(move |event: &RateLimiterEvent| {
                if let RateLimiterEvent::WindowReset { identifier, .. } = event {
                    f(identifier);
                }
            }));
        self
    }

    fn into_config(self) -> RateLimiterConfig {
        RateLimiterConfig {
            limit: self.limit,
            window: self.window,
            event_listeners: self.event_listeners,
            name: self.name,
        }
    }

    /// Builds the rate limiter.
    pub fn build(self) -> RateLimiter {
        RateLimiter::with_config(self.into_config())
    }
}

impl Default for RateLimiterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
