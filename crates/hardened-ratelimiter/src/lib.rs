//! Fixed-window rate limiting for hardened-fetch.
//!
//! [`RateLimiter`] caps how many calls each identifier (usually a host) may
//! make per window. Windows are created lazily on an identifier's first call
//! and replaced by a fresh one on the first call after they lapse. A denied
//! call is not counted.
//!
//! Fixed windows allow a burst of up to twice the limit across a window
//! boundary.
//!
//! # Examples
//!
//! ```
//! use hardened_ratelimiter::RateLimiter;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let limiter = RateLimiter::builder()
//!     .limit(2)
//!     .window(Duration::from_secs(1))
//!     .on_rejected(|id| println!("throttled {id}"))
//!     .build();
//!
//! assert!(limiter.allow("api.example.com"));
//! assert!(limiter.allow("api.example.com"));
//! assert!(!limiter.allow("api.example.com"));
//! assert!(limiter.allow("other.example.com"));
//! # }
//! ```

mod config;
mod error;
mod events;
mod window;

pub use config::{RateLimiterConfig, RateLimiterConfigBuilder, DEFAULT_LIMIT, DEFAULT_WINDOW};
pub use error::RateLimiterError;
pub use events::RateLimiterEvent;

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tokio::time::Instant;
use window::{Admission, RateWindow};

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

struct Inner {
    config: RateLimiterConfig,
    windows: DashMap<String, RateWindow>,
}

/// Shared per-identifier rate limiter. Clones share all windows.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("name", &self.inner.config.name)
            .field("limit", &self.inner.config.limit)
            .field("window", &self.inner.config.window)
            .field("active_windows", &self.inner.windows.len())
            .finish()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Creates a limiter allowing 60 calls per identifier per minute.
    pub fn new() -> Self {
        Self::with_config(RateLimiterConfig::default())
    }

    /// Creates a new configuration builder.
    pub fn builder() -> RateLimiterConfigBuilder {
        RateLimiterConfigBuilder::new()
    }

    /// Creates a limiter from an explicit configuration.
    pub fn with_config(config: RateLimiterConfig) -> Self {
        #[cfg(feature = "metrics")]
        describe_counter!(
            "hardened_ratelimit_calls_total",
            "Total number of admission checks (admitted and rejected)"
        );

        Self {
            inner: Arc::new(Inner {
                config,
                windows: DashMap::new(),
            }),
        }
    }

    /// The limiter's configuration.
    pub fn config(&self) -> &RateLimiterConfig {
        &self.inner.config
    }

    /// Counts a call for `identifier` and returns whether it is admitted.
    pub fn allow(&self, identifier: &str) -> bool {
        let config = &self.inner.config;
        let now = Instant::now();

        let existing = self
            .inner
            .windows
            .get_mut(identifier)
            .map(|mut window| window.admit(now, config.limit, config.window));
        let admission = match existing {
            Some(admission) => admission,
            // Another caller may have opened the window since the lookup.
            None => match self.inner.windows.entry(identifier.to_string()) {
                dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                    entry.get_mut().admit(now, config.limit, config.window)
                }
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    entry.insert(RateWindow::open(now, config.window));
                    Admission::Opened
                }
            },
        };

        let admitted = admission != Admission::Rejected;

        #[cfg(feature = "metrics")]
        {
            let result = if admitted { "admitted" } else { "rejected" };
            counter!("hardened_ratelimit_calls_total", "limiter" => config.name.clone(), "result" => result)
                .increment(1);
        }

        #[cfg(feature = "tracing")]
        self.trace(identifier, admission);

        if !config.event_listeners.is_empty() {
            let limiter_name = config.name.clone();
            let timestamp = std::time::Instant::now();
            let identifier = identifier.to_string();
            let event = match admission {
                Admission::Admitted => RateLimiterEvent::Admitted {
                    limiter_name,
                    timestamp,
                    identifier,
                },
                Admission::Opened => RateLimiterEvent::WindowReset {
                    limiter_name,
                    timestamp,
                    identifier,
                },
                Admission::Rejected => RateLimiterEvent::Rejected {
                    limiter_name,
                    timestamp,
                    identifier,
                },
            };
            config.event_listeners.emit(&event);
        }

        admitted
    }

    /// Like [`allow`](Self::allow), but returns an error on denial.
    pub fn try_acquire(&self, identifier: &str) -> Result<(), RateLimiterError> {
        if self.allow(identifier) {
            Ok(())
        } else {
            Err(RateLimiterError::RateLimitExceeded {
                identifier: identifier.to_string(),
            })
        }
    }

    /// Number of identifiers with a tracked window, lapsed or not.
    pub fn active_windows(&self) -> usize {
        self.inner.windows.len()
    }

    /// Forgets every window.
    pub fn reset(&self) {
        self.inner.windows.clear();
    }

    #[cfg(feature = "tracing")]
    fn trace(&self, identifier: &str, admission: Admission) {
        let name = &self.inner.config.name;
        match admission {
            Admission::Admitted => debug!(limiter = %name, identifier, "Call admitted"),
            Admission::Opened => debug!(limiter = %name, identifier, "Rate window opened"),
            Admission::Rejected => warn!(limiter = %name, identifier, "Rate limit exceeded"),
        }
    }
}
