//! Configuration for the TTL cache.

use crate::events::CacheEvent;
use crate::TtlCache;
use hardened_core::{EventListeners, FnListener};
use std::marker::PhantomData;
use std::time::Duration;

/// Default capacity.
pub const DEFAULT_MAX_SIZE: usize = 1000;

/// TTL applied by [`TtlCache::insert`] unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Preset TTL for price quotes.
pub const QUOTE_TTL: Duration = Duration::from_secs(10);

/// Preset TTL for slower-moving market data.
pub const MARKET_DATA_TTL: Duration = Duration::from_secs(60);

/// Configuration for a [`TtlCache`].
pub struct CacheConfig {
    pub(crate) max_size: usize,
    pub(crate) default_ttl: Duration,
    pub(crate) event_listeners: EventListeners<CacheEvent>,
    pub(crate) name: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfigBuilder::<()>::new().into_config()
    }
}

impl CacheConfig {
    /// Creates a new configuration builder for a cache of `V`.
    pub fn builder<V>() -> CacheConfigBuilder<V> {
        CacheConfigBuilder::new()
    }

    /// Entry count at which writes start evicting. Always at least 1.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// TTL used by [`TtlCache::insert`](crate::TtlCache::insert).
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for configuring and constructing a cache of `V`.
pub struct CacheConfigBuilder<V> {
    max_size: usize,
    default_ttl: Duration,
    event_listeners: EventListeners<CacheEvent>,
    name: String,
    _value: PhantomData<fn() -> V>,
}

impl<V> CacheConfigBuilder<V> {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            default_ttl: DEFAULT_TTL,
            event_listeners: EventListeners::new(),
            name: String::from("<unnamed>"),
            _value: PhantomData,
        }
    }

    /// Sets the maximum number of entries in the cache.
    ///
    /// Values below 1 are raised to 1. Default: 1000
    pub fn max_size(mut self, size: usize) -> Self {
        self.max_size = size.max(1);
        self
    }

    /// Sets the TTL used when no explicit TTL is given.
    ///
    /// Default: 30 seconds
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the name of this cache instance for observability.
    ///
    /// Default: `"<unnamed>"`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked with the key on a cache hit.
    pub fn on_hit<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(FnListener::new(move |event: &CacheEvent| {
                if let CacheEvent::Hit { key, .. } = event {
                    f(key);
                }
            }));
        self
    }

    /// Registers a callback invoked with the key on a miss, including an
    /// expired entry.
    pub fn on_miss<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(FnListener::new(move |event: &CacheEvent| match event {
                CacheEvent::Miss { key, .. } | CacheEvent::Expired { key, .. } => f(key),
                _ => {}
            }));
        self
    }

    /// Registers a callback invoked with the key when an entry expires.
    pub fn on_expired<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(FnListener::new(move |event: &CacheEvent| {
                if let CacheEvent::Expired { key, .. } = event {
                    f(key);
                }
            }));
        self
    }

    /// Registers a callback invoked with the key of each evicted entry.
    pub fn on_eviction<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners
            .add(FnListener::new(move |event: &CacheEvent| {
                if let CacheEvent::Eviction { key, .. } = event {
                    f(key);
                }
            }));
        self
    }

    fn into_config(self) -> CacheConfig {
        CacheConfig {
            max_size: self.max_size,
            default_ttl: self.default_ttl,
            event_listeners: self.event_listeners,
            name: self.name,
        }
    }

    /// Builds the cache.
    pub fn build(self) -> TtlCache<V>
    where
        V: Clone,
    {
        TtlCache::with_config(self.into_config())
    }
}

impl<V> Default for CacheConfigBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}
