//! Property tests for the TTL cache.
//!
//! Invariants tested:
//! - Size never exceeds max_size
//! - The most recent write is always readable within its TTL
//! - Nothing is served past its TTL

use super::paused_runtime;
use hardened_cache::TtlCache;
use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: size stays within capacity under arbitrary writes
    #[test]
    fn size_never_exceeds_capacity(
        max_size in 1usize..=50,
        writes in prop::collection::vec((0u32..200, 1u64..=10_000), 1..300),
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let cache = TtlCache::builder().max_size(max_size).build();

            for (key, ttl_ms) in writes {
                let key = format!("key-{key}");
                cache.set(key.clone(), ttl_ms, Duration::from_millis(ttl_ms));
                prop_assert!(cache.len() <= max_size);
                prop_assert_eq!(cache.get(&key), Some(ttl_ms));
                tokio::time::advance(Duration::from_millis(1)).await;
            }
            Ok(())
        })?;
    }

    /// Property: reads agree with a model that only tracks expiry
    #[test]
    fn reads_honour_ttl(
        writes in prop::collection::vec((0u32..10, 1u64..=100, 0u64..=50), 1..100),
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            // Large enough that nothing is evicted.
            let cache = TtlCache::builder().max_size(100).build();
            let mut model: HashMap<String, (u32, tokio::time::Instant, Duration)> =
                HashMap::new();

            for (i, (key, ttl_ms, wait_ms)) in writes.into_iter().enumerate() {
                let key = format!("key-{key}");
                let ttl = Duration::from_millis(ttl_ms);
                let value = u32::try_from(i).unwrap();
                cache.set(key.clone(), value, ttl);
                model.insert(key, (value, tokio::time::Instant::now(), ttl));

                tokio::time::advance(Duration::from_millis(wait_ms)).await;

                let now = tokio::time::Instant::now();
                for (key, (value, stored_at, ttl)) in &model {
                    let live = now.duration_since(*stored_at) <= *ttl;
                    let read = cache.get(key);
                    if live {
                        prop_assert_eq!(read, Some(*value));
                    } else {
                        prop_assert_eq!(read, None);
                    }
                }
                model.retain(|_, (_, stored_at, ttl)| now.duration_since(*stored_at) <= *ttl);
            }
            Ok(())
        })?;
    }
}
