use hardened_core::FetchEvent;
use std::time::Instant;

/// Events emitted by a [`TtlCache`](crate::TtlCache).
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// A live entry was returned.
    Hit {
        cache_name: String,
        timestamp: Instant,
        key: String,
    },
    /// No entry was stored under the key.
    Miss {
        cache_name: String,
        timestamp: Instant,
        key: String,
    },
    /// An entry was found past its TTL and deleted.
    Expired {
        cache_name: String,
        timestamp: Instant,
        key: String,
    },
    /// An entry was dropped to make room for an insertion.
    Eviction {
        cache_name: String,
        timestamp: Instant,
        key: String,
    },
}

impl CacheEvent {
    /// The key the event concerns.
    pub fn key(&self) -> &str {
        match self {
            CacheEvent::Hit { key, .. }
            | CacheEvent::Miss { key, .. }
            | CacheEvent::Expired { key, .. }
            | CacheEvent::Eviction { key, .. } => key,
        }
    }
}

impl FetchEvent for CacheEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "hit",
            CacheEvent::Miss { .. } => "miss",
            CacheEvent::Expired { .. } => "expired",
            CacheEvent::Eviction { .. } => "eviction",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CacheEvent::Hit { timestamp, .. }
            | CacheEvent::Miss { timestamp, .. }
            | CacheEvent::Expired { timestamp, .. }
            | CacheEvent::Eviction { timestamp, .. } => *timestamp,
        }
    }

    fn component(&self) -> &str {
        match self {
            CacheEvent::Hit { cache_name, .. }
            | CacheEvent::Miss { cache_name, .. }
            | CacheEvent::Expired { cache_name, .. }
            | CacheEvent::Eviction { cache_name, .. } => cache_name,
        }
    }
}
