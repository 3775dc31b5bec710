//! Core retry behavior tests.
//!
//! Tests core retry logic including:
//! - Success on first attempt (no retries)
//! - Success after N retries
//! - Exhaust all attempts and return the last failure
//! - Stop retrying on non-retryable failures
//! - One recorded outcome per top-level call

use hardened_core::{Classify, FetchError, TransportErrorKind};
use hardened_retry::{RetryConfig, RetryExecutor};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn executor(max_retries: usize) -> RetryExecutor {
    RetryExecutor::builder()
        .max_retries(max_retries)
        .base_delay(Duration::from_millis(10))
        .max_jitter(Duration::ZERO)
        .build()
}

#[tokio::test(start_paused = true)]
async fn success_on_first_attempt_no_retry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);

    let result = executor(5)
        .execute("api.example.com", || {
            c.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, FetchError>("quote") }
        })
        .await;

    assert_eq!(result.unwrap(), "quote");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn always_retryable_failure_makes_max_retries_plus_one_calls() {
    for max_retries in [0, 1, 3, 5] {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);

        let result: Result<(), _> = executor(max_retries)
            .execute("api.example.com", || {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err(FetchError::transport(TransportErrorKind::Connect, "refused")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), max_retries + 1);
    }
}

#[tokio::test(start_paused = true)]
async fn bad_request_is_called_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);

    let result: Result<(), _> = executor(3)
        .execute("api.example.com", || {
            c.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::http(400)) }
        })
        .await;

    assert_eq!(result.unwrap_err().status_code(), Some(400));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn retryable_statuses_are_retried() {
    for status in [408, 429, 500, 502, 503, 504] {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);

        let _: Result<(), _> = executor(2)
            .execute("api.example.com", || {
                c.fetch_add(1, Ordering::SeqCst);
                async move { Err(FetchError::http(status)) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3, "status {status}");
    }
}

#[tokio::test(start_paused = true)]
async fn network_messages_are_retried_others_are_not() {
    let cases = [
        ("Network error", 3),
        ("fetch failed", 3),
        ("NETWORK unreachable", 3),
        ("Validation error", 1),
    ];
    for (message, expected_calls) in cases {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);

        let _: Result<(), _> = executor(2)
            .execute("api.example.com", || {
                c.fetch_add(1, Ordering::SeqCst);
                async move { Err(FetchError::other(message)) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), expected_calls, "{message}");
    }
}

#[tokio::test(start_paused = true)]
async fn last_failure_is_returned_unchanged() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);

    let result: Result<(), _> = executor(2)
        .execute("api.example.com", || {
            let n = c.fetch_add(1, Ordering::SeqCst);
            async move {
                Err(match n {
                    0 => FetchError::http(500),
                    1 => FetchError::http(502),
                    _ => FetchError::http(503),
                })
            }
        })
        .await;

    assert_eq!(result.unwrap_err(), FetchError::http(503));
}

#[tokio::test(start_paused = true)]
async fn recovers_after_two_failures() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let executor = executor(3);

    let result = executor
        .execute("api.example.com", || {
            let n = c.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(FetchError::http(500))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), 2);
    let metrics = executor.metrics().snapshot();
    assert_eq!(metrics.total_requests, 1);
    assert_eq!(metrics.success_rate, 100.0);
    assert_eq!(metrics.retry_rate, 100.0);
}

#[tokio::test(start_paused = true)]
async fn per_call_config_overrides_executor_default() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let override_config = RetryConfig::builder()
        .max_retries(1)
        .base_delay(Duration::from_millis(1))
        .max_jitter(Duration::ZERO)
        .build();

    let _: Result<(), _> = executor(5)
        .execute_with(&override_config, "api.example.com", || {
            c.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::http(503)) }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn shared_collector_sees_every_executor() {
    let collector = hardened_metrics::MetricsCollector::new();
    let first = RetryExecutor::builder()
        .max_retries(0)
        .metrics(collector.clone())
        .build();
    let second = RetryExecutor::builder()
        .max_retries(0)
        .metrics(collector.clone())
        .build();

    let _ = first
        .execute("a", || async { Ok::<_, FetchError>(()) })
        .await;
    let _ = second
        .execute("b", || async { Err::<(), _>(FetchError::http(500)) })
        .await;

    let metrics = collector.snapshot();
    assert_eq!(metrics.total_requests, 2);
    assert_eq!(metrics.success_rate, 50.0);
}

/// A domain error outside hardened-core, classified by its own rules.
#[derive(Debug)]
enum QuoteError {
    Stale,
    Unknown,
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteError::Stale => f.write_str("stale quote"),
            QuoteError::Unknown => f.write_str("unknown pair"),
        }
    }
}

impl Classify for QuoteError {
    fn is_retryable(&self) -> bool {
        matches!(self, QuoteError::Stale)
    }
}

#[tokio::test(start_paused = true)]
async fn custom_error_types_use_their_own_classification() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let executor = executor(3);

    let result: Result<(), _> = executor
        .execute("api.example.com", || {
            let n = c.fetch_add(1, Ordering::SeqCst);
            async move {
                Err(if n == 0 {
                    QuoteError::Stale
                } else {
                    QuoteError::Unknown
                })
            }
        })
        .await;

    assert!(matches!(result, Err(QuoteError::Unknown)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
