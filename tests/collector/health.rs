//! Health status thresholds.

use hardened_metrics::{HealthStatus, MetricsCollector, RequestOutcome};
use tokio::time::Instant;

fn collector_with(successes: usize, failures: usize) -> MetricsCollector {
    let collector = MetricsCollector::new();
    let now = Instant::now();
    for _ in 0..successes {
        collector.record(RequestOutcome::success(now, now, 0));
    }
    for _ in 0..failures {
        collector.record(RequestOutcome::failure(now, now, "boom", Some(503), 3));
    }
    collector
}

#[tokio::test(start_paused = true)]
async fn thresholds() {
    assert_eq!(collector_with(96, 4).health_status(), HealthStatus::Healthy);
    assert_eq!(collector_with(85, 15).health_status(), HealthStatus::Degraded);
    assert_eq!(collector_with(50, 50).health_status(), HealthStatus::Unhealthy);
}

#[tokio::test(start_paused = true)]
async fn boundaries_are_exclusive() {
    assert_eq!(collector_with(95, 5).health_status(), HealthStatus::Degraded);
    assert_eq!(collector_with(80, 20).health_status(), HealthStatus::Unhealthy);
}

#[tokio::test(start_paused = true)]
async fn no_traffic_is_unhealthy() {
    let collector = MetricsCollector::new();
    assert_eq!(collector.snapshot().total_requests, 0);
    assert_eq!(collector.health_status(), HealthStatus::Unhealthy);
}

#[test]
fn status_serializes_lowercase() {
    assert_eq!(
        serde_json::to_string(&HealthStatus::Degraded).unwrap(),
        r#""degraded""#
    );
    assert_eq!(HealthStatus::Healthy.to_string(), "healthy");
}
