//! Cache storage.

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Fraction of the current size evicted when the cache is full.
const EVICTION_FRACTION: usize = 10;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
    seq: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }
}

/// Result of a lookup.
#[derive(Debug, PartialEq)]
pub(crate) enum Lookup<V> {
    Hit(V),
    Miss,
    Expired,
}

/// Key/value map with per-entry TTL and oldest-first eviction.
///
/// Not synchronized; [`TtlCache`](crate::TtlCache) wraps it in a mutex.
#[derive(Debug)]
pub(crate) struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    max_size: usize,
    next_seq: u64,
}

impl<V: Clone> CacheStore<V> {
    pub(crate) fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_size,
            next_seq: 0,
        }
    }

    /// Returns the value if it is still live, deleting it if it has expired.
    pub(crate) fn get(&mut self, key: &str, now: Instant) -> Lookup<V> {
        match self.entries.get(key) {
            None => Lookup::Miss,
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                Lookup::Expired
            }
            Some(entry) => Lookup::Hit(entry.value.clone()),
        }
    }

    /// Stores `value`, evicting the oldest entries first if the store is full.
    ///
    /// Returns the evicted keys.
    pub(crate) fn insert(
        &mut self,
        key: String,
        value: V,
        ttl: Duration,
        now: Instant,
    ) -> Vec<String> {
        let evicted = if self.entries.len() >= self.max_size {
            self.evict_oldest(&key)
        } else {
            Vec::new()
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
                ttl,
                seq,
            },
        );
        evicted
    }

    // Removes max(1, len / 10) entries ordered by (stored_at, seq), skipping
    // `protected`.
    fn evict_oldest(&mut self, protected: &str) -> Vec<String> {
        let count = (self.entries.len() / EVICTION_FRACTION).max(1);

        let mut candidates: Vec<(Instant, u64, &String)> = self
            .entries
            .iter()
            .filter(|(key, _)| key.as_str() != protected)
            .map(|(key, entry)| (entry.stored_at, entry.seq, key))
            .collect();
        candidates.sort_unstable();

        let victims: Vec<String> = candidates
            .into_iter()
            .take(count)
            .map(|(_, _, key)| key.clone())
            .collect();
        for key in &victims {
            self.entries.remove(key);
        }
        victims
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn max_size(&self) -> usize {
        self.max_size
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
