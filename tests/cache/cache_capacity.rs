//! Capacity eviction tests.

use hardened_cache::TtlCache;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(300);

#[tokio::test(start_paused = true)]
async fn overflowing_default_capacity_drops_earliest_entries() {
    let cache = TtlCache::new();
    assert_eq!(cache.max_size(), 1000);

    for i in 0..=1000 {
        cache.set(format!("key-{i}"), i, TTL);
        tokio::time::advance(Duration::from_millis(1)).await;
    }

    assert!(cache.len() <= 1000);
    assert_eq!(cache.get("key-0"), None);
    assert_eq!(cache.get("key-99"), None);
    for i in 900..=1000 {
        assert_eq!(cache.get(&format!("key-{i}")), Some(i), "key-{i}");
    }
}

#[tokio::test(start_paused = true)]
async fn eviction_removes_a_tenth_of_the_entries() {
    let evicted = Arc::new(AtomicUsize::new(0));
    let e = Arc::clone(&evicted);
    let cache = TtlCache::builder()
        .max_size(100)
        .on_eviction(move |_| {
            e.fetch_add(1, Ordering::SeqCst);
        })
        .build();

    for i in 0..100 {
        cache.set(format!("key-{i}"), i, TTL);
    }
    assert_eq!(evicted.load(Ordering::SeqCst), 0);

    cache.set("key-100", 100, TTL);
    assert_eq!(evicted.load(Ordering::SeqCst), 10);
    assert_eq!(cache.len(), 91);
    assert_eq!(cache.get("key-9"), None);
    assert_eq!(cache.get("key-10"), Some(10));
}

#[tokio::test(start_paused = true)]
async fn tiny_cache_stays_bounded() {
    let cache = TtlCache::builder().max_size(3).build();
    for i in 0..50 {
        cache.set(format!("key-{i}"), i, TTL);
        assert!(cache.len() <= 3, "len {} after {i}", cache.len());
    }
    assert_eq!(cache.get("key-49"), Some(49));
}

#[tokio::test(start_paused = true)]
async fn overwriting_in_a_full_cache_evicts_the_oldest_other_entry() {
    let cache = TtlCache::builder().max_size(2).build();
    cache.set("a", 1, TTL);
    cache.set("b", 2, TTL);
    cache.set("a", 10, TTL);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.get("a"), Some(10));
}

#[tokio::test(start_paused = true)]
async fn utilization_tracks_size() {
    let cache = TtlCache::builder().max_size(200).build();
    for i in 0..50 {
        cache.insert(format!("key-{i}"), ());
    }
    assert_eq!(cache.utilization_percent(), 25.0);
}
