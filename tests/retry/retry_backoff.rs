//! Backoff schedule tests.
//!
//! The clock is paused, so measured gaps between attempts are exact.

use hardened_core::FetchError;
use hardened_retry::{RetryConfig, RetryExecutor};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

async fn attempt_times(executor: &RetryExecutor) -> Vec<Duration> {
    let start = Instant::now();
    let times = Arc::new(Mutex::new(Vec::new()));
    let t = Arc::clone(&times);

    let _: Result<(), _> = executor
        .execute("api.example.com", || {
            t.lock().unwrap().push(start.elapsed());
            async { Err(FetchError::http(503)) }
        })
        .await;

    let times = times.lock().unwrap().clone();
    times
}

#[tokio::test(start_paused = true)]
async fn default_schedule_doubles_until_cap() {
    let executor = RetryExecutor::builder()
        .max_retries(5)
        .max_jitter(Duration::ZERO)
        .build();

    let times = attempt_times(&executor).await;
    let gaps: Vec<Duration> = times.windows(2).map(|w| w[1] - w[0]).collect();
    assert_eq!(
        gaps,
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(4000),
            Duration::from_millis(8000),
            Duration::from_millis(10_000),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn jitter_stays_within_bound() {
    let executor = RetryExecutor::builder()
        .max_retries(4)
        .base_delay(Duration::from_millis(100))
        .max_delay(Duration::from_millis(400))
        .max_jitter(Duration::from_millis(50))
        .build();

    let times = attempt_times(&executor).await;
    let config = executor.config();
    for (i, pair) in times.windows(2).enumerate() {
        let gap = pair[1] - pair[0];
        let floor = config.capped_delay(i);
        assert!(gap >= floor, "gap {i} = {gap:?} below {floor:?}");
        assert!(
            gap <= floor + Duration::from_millis(50),
            "gap {i} = {gap:?} above {floor:?} + jitter"
        );
    }
}

#[test]
fn capped_delay_matches_formula() {
    let config = RetryConfig::builder()
        .base_delay(Duration::from_millis(250))
        .backoff_multiplier(3.0)
        .max_delay(Duration::from_secs(5))
        .build();

    assert_eq!(config.capped_delay(0), Duration::from_millis(250));
    assert_eq!(config.capped_delay(1), Duration::from_millis(750));
    assert_eq!(config.capped_delay(2), Duration::from_millis(2250));
    assert_eq!(config.capped_delay(3), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn no_sleep_after_final_attempt() {
    let executor = RetryExecutor::builder()
        .max_retries(2)
        .base_delay(Duration::from_millis(100))
        .max_jitter(Duration::ZERO)
        .build();

    let start = Instant::now();
    let _: Result<(), _> = executor
        .execute("api.example.com", || async { Err(FetchError::http(500)) })
        .await;

    // 100ms + 200ms of backoff, nothing after the third failure.
    assert_eq!(start.elapsed(), Duration::from_millis(300));
}
