//! Bounded TTL cache for hardened-fetch.
//!
//! [`TtlCache`] stores values under string keys, each with its own time to
//! live. A value is returned only while `now <= stored_at + ttl`; reading an
//! expired entry deletes it. When an insertion finds the cache full, the
//! oldest tenth of the other entries (at least one) is evicted first, ordered
//! by insertion time. This applies to overwrites too.
//!
//! The cache is a cheap handle: clones share one store.
//!
//! # Features
//!
//! - **Per-entry TTL** with a configurable default and [`QUOTE_TTL`] /
//!   [`MARKET_DATA_TTL`] presets
//! - **Bulk eviction** that keeps the cache within `max_size`
//! - **Event System**: observability through cache events (Hit, Miss,
//!   Expired, Eviction)
//!
//! # Examples
//!
//! ```
//! use hardened_cache::{TtlCache, QUOTE_TTL};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let cache = TtlCache::builder()
//!     .max_size(100)
//!     .name("quotes")
//!     .on_eviction(|key| println!("evicted {key}"))
//!     .build();
//!
//! cache.set("quote:ETH-USDC", 3150.25_f64, QUOTE_TTL);
//! assert_eq!(cache.get("quote:ETH-USDC"), Some(3150.25));
//! assert_eq!(cache.get("quote:BTC-USDC"), None);
//! # }
//! ```

mod config;
mod events;
mod store;

pub use config::{
    CacheConfig, CacheConfigBuilder, DEFAULT_MAX_SIZE, DEFAULT_TTL, MARKET_DATA_TTL, QUOTE_TTL,
};
pub use events::CacheEvent;

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use store::{CacheStore, Lookup};
use tokio::time::Instant;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter, describe_gauge, gauge};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

struct Inner<V> {
    config: CacheConfig,
    store: Mutex<CacheStore<V>>,
}

/// Shared, thread-safe TTL cache.
pub struct TtlCache<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("name", &self.inner.config.name)
            .field("max_size", &self.inner.config.max_size)
            .field("default_ttl", &self.inner.config.default_ttl)
            .finish()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> TtlCache<V> {
    /// Creates a cache with 1000 entries and a 30 second default TTL.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a new configuration builder.
    pub fn builder() -> CacheConfigBuilder<V> {
        CacheConfigBuilder::new()
    }

    /// Creates a cache from an explicit configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            describe_counter!(
                "hardened_cache_requests_total",
                "Total number of cache lookups (hits and misses)"
            );
            describe_counter!(
                "hardened_cache_evictions_total",
                "Total number of capacity evictions"
            );
            describe_gauge!(
                "hardened_cache_size",
                "Current number of entries in the cache"
            );
        }

        let store = Mutex::new(CacheStore::new(config.max_size));
        Self {
            inner: Arc::new(Inner { config, store }),
        }
    }

    /// The cache's configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Returns a clone of the live value stored under `key`.
    pub fn get(&self, key: &str) -> Option<V> {
        let lookup = self.inner.store.lock().get(key, Instant::now());
        let config = &self.inner.config;

        #[cfg(feature = "metrics")]
        {
            let result = if matches!(lookup, Lookup::Hit(_)) {
                "hit"
            } else {
                "miss"
            };
            counter!("hardened_cache_requests_total", "cache" => config.name.clone(), "result" => result)
                .increment(1);
        }

        let timestamp = std::time::Instant::now();
        match lookup {
            Lookup::Hit(value) => {
                #[cfg(feature = "tracing")]
                debug!(cache = %config.name, key, "Cache hit");

                config.event_listeners.emit(&CacheEvent::Hit {
                    cache_name: config.name.clone(),
                    timestamp,
                    key: key.to_string(),
                });
                Some(value)
            }
            Lookup::Miss => {
                #[cfg(feature = "tracing")]
                debug!(cache = %config.name, key, "Cache miss");

                config.event_listeners.emit(&CacheEvent::Miss {
                    cache_name: config.name.clone(),
                    timestamp,
                    key: key.to_string(),
                });
                None
            }
            Lookup::Expired => {
                #[cfg(feature = "tracing")]
                debug!(cache = %config.name, key, "Cache entry expired");

                #[cfg(feature = "metrics")]
                gauge!("hardened_cache_size", "cache" => config.name.clone())
                    .set(self.len() as f64);

                config.event_listeners.emit(&CacheEvent::Expired {
                    cache_name: config.name.clone(),
                    timestamp,
                    key: key.to_string(),
                });
                None
            }
        }
    }

    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let (evicted, _size) = {
            let mut store = self.inner.store.lock();
            let evicted = store.insert(key, value, ttl, Instant::now());
            (evicted, store.len())
        };
        let config = &self.inner.config;

        #[cfg(feature = "metrics")]
        gauge!("hardened_cache_size", "cache" => config.name.clone()).set(_size as f64);

        if evicted.is_empty() {
            return;
        }

        #[cfg(feature = "metrics")]
        counter!("hardened_cache_evictions_total", "cache" => config.name.clone())
            .increment(evicted.len() as u64);

        #[cfg(feature = "tracing")]
        info!(cache = %config.name, evicted = evicted.len(), "Cache full, evicted oldest entries");

        let timestamp = std::time::Instant::now();
        for key in evicted {
            config.event_listeners.emit(&CacheEvent::Eviction {
                cache_name: config.name.clone(),
                timestamp,
                key,
            });
        }
    }

    /// Stores `value` under `key` with the configured default TTL.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.set(key, value, self.inner.config.default_ttl);
    }

    /// Removes and returns the entry under `key`, live or not.
    pub fn remove(&self, key: &str) -> Option<V> {
        self.inner.store.lock().remove(key)
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.inner.store.lock().clear();

        #[cfg(feature = "metrics")]
        gauge!("hardened_cache_size", "cache" => self.inner.config.name.clone()).set(0.0);
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.inner.store.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    pub fn max_size(&self) -> usize {
        self.inner.store.lock().max_size()
    }

    /// `len / max_size` as a percentage.
    pub fn utilization_percent(&self) -> f64 {
        let store = self.inner.store.lock();
        store.len() as f64 * 100.0 / store.max_size() as f64
    }
}
