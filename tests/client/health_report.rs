//! The serialized health report.

use super::Script;
use hardened_client::{ClientSettings, HardenedClient, HealthStatus};
use serde_json::Value;

#[tokio::test(start_paused = true)]
async fn fresh_client_reports_unhealthy() {
    let client = HardenedClient::new(Script::statuses(&[]).service());
    let report = client.health_report();

    assert_eq!(report.status, HealthStatus::Unhealthy);
    assert_eq!(report.metrics.total_requests, 0);
    assert_eq!(report.cache.size, 0);
    assert_eq!(report.cache.max_size, 1000);
    assert_eq!(report.rate_limit.active_window_count, 0);
    assert!(report.timestamp_millis > 0);
}

#[tokio::test(start_paused = true)]
async fn report_reflects_usage() {
    let script = Script::statuses(&[404]);
    let settings: ClientSettings =
        serde_json::from_str(r#"{"cache_max_size": 4, "max_retries": 0}"#).unwrap();
    let client = HardenedClient::builder(script.service())
        .settings(settings)
        .build();

    let _ = client.get::<Value>("https://api.example.com/missing").await;
    let _: Value = client
        .get_cached("https://api.example.com/quote", "q", None)
        .await
        .unwrap();
    let _: Value = client.get("https://rpc.example.org/block").await.unwrap();

    let report = client.health_report();
    assert_eq!(report.metrics.total_requests, 3);
    assert!((report.metrics.success_rate - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(report.status, HealthStatus::Unhealthy);
    assert_eq!(report.cache.size, 1);
    assert_eq!(report.cache.max_size, 4);
    assert_eq!(report.cache.utilization_percent, 25.0);
    assert_eq!(report.rate_limit.active_window_count, 2);
}

#[tokio::test(start_paused = true)]
async fn report_serializes_with_camel_case_keys() {
    let client = HardenedClient::new(Script::statuses(&[]).service());
    let _: Value = client.get("https://api.example.com/quote").await.unwrap();

    let json = serde_json::to_value(client.health_report()).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["metrics"]["totalRequests"], 1);
    assert_eq!(json["metrics"]["successRate"], 100.0);
    assert_eq!(json["metrics"]["cancelledRequests"], 0);
    assert!(json["metrics"]["averageLatency"].is_number());
    assert!(json["metrics"]["errorRate"].is_number());
    assert!(json["metrics"]["retryRate"].is_number());
    assert_eq!(json["cache"]["maxSize"], 1000);
    assert_eq!(json["cache"]["utilizationPercent"], 0.0);
    assert_eq!(json["rateLimit"]["activeWindowCount"], 1);
    assert!(json["timestampMillis"].as_u64().unwrap() > 0);
}
