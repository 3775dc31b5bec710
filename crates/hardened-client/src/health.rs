use hardened_metrics::{HealthStatus, Metrics};
use serde::Serialize;

/// Point-in-time view of a client's health, suitable for a health endpoint.
///
/// Serializes with camelCase keys:
///
/// ```json
/// {
///   "status": "healthy",
///   "metrics": { "totalRequests": 12, "successRate": 100.0, ... },
///   "cache": { "size": 3, "maxSize": 1000, "utilizationPercent": 0.3 },
///   "rateLimit": { "activeWindowCount": 1 },
///   "timestampMillis": 1760870400000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub metrics: Metrics,
    pub cache: CacheStats,
    pub rate_limit: RateLimitStats,
    /// Wall-clock time of the report, in milliseconds since the Unix epoch.
    pub timestamp_millis: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub utilization_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStats {
    pub active_window_count: usize,
}
