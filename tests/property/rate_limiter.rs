//! Property tests for the fixed-window rate limiter.
//!
//! Invariants tested:
//! - At most `limit` admissions per identifier per window
//! - Identifiers never share budget
//! - A lapsed window grants a full new budget

use super::paused_runtime;
use hardened_ratelimiter::RateLimiter;
use proptest::prelude::*;
use std::time::Duration;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: admissions within one window never exceed the limit
    #[test]
    fn admissions_bounded_by_limit(limit in 1usize..=100, calls in 0usize..=300) {
        let rt = paused_runtime();
        rt.block_on(async {
            let limiter = RateLimiter::builder()
                .limit(limit)
                .window(Duration::from_secs(60))
                .build();

            let admitted = (0..calls).filter(|_| limiter.allow("host")).count();
            prop_assert_eq!(admitted, calls.min(limit));
            Ok(())
        })?;
    }

    /// Property: each identifier has an independent budget
    #[test]
    fn identifiers_are_independent(
        limit in 1usize..=20,
        sequence in prop::collection::vec(0usize..5, 0..200),
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let limiter = RateLimiter::builder().limit(limit).build();
            let mut counts = [0usize; 5];

            for id in sequence {
                let admitted = limiter.allow(&format!("host-{id}"));
                prop_assert_eq!(admitted, counts[id] < limit);
                if admitted {
                    counts[id] += 1;
                }
            }
            Ok(())
        })?;
    }

    /// Property: after the window lapses the full budget is available again
    #[test]
    fn lapsed_window_restores_budget(limit in 1usize..=50, window_ms in 1u64..=10_000) {
        let rt = paused_runtime();
        rt.block_on(async {
            let limiter = RateLimiter::builder()
                .limit(limit)
                .window(Duration::from_millis(window_ms))
                .build();

            for _ in 0..limit {
                prop_assert!(limiter.allow("host"));
            }
            prop_assert!(!limiter.allow("host"));

            tokio::time::advance(Duration::from_millis(window_ms + 1)).await;
            for _ in 0..limit {
                prop_assert!(limiter.allow("host"));
            }
            prop_assert!(!limiter.allow("host"));
            Ok(())
        })?;
    }
}
