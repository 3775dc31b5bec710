//! Property-based tests for hardened-fetch.
//!
//! Run with: cargo test --test property_tests
//!
//! These tests use proptest to generate random inputs and verify that
//! the retry, cache and rate-limit invariants hold.

pub mod cache;
pub mod rate_limiter;

/// A current-thread runtime with a paused clock, so backoff sleeps
/// complete instantly.
pub(crate) fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}
