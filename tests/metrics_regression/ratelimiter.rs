//! Rate limiter metrics regression tests

use super::helpers::*;
use hardened_ratelimiter::RateLimiter;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn ratelimiter_metrics_exist() {
    init_recorder();

    let limiter = RateLimiter::builder().name("test_limiter").limit(1).build();

    assert!(limiter.allow("api.example.com"));
    assert!(!limiter.allow("api.example.com"));

    for result in ["admitted", "rejected"] {
        assert_counter(
            "hardened_ratelimit_calls_total",
            &[("limiter", "test_limiter"), ("result", result)],
        );
    }
}
