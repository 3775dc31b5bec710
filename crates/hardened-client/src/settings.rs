use serde::Deserialize;
use std::time::Duration;

/// Start-up configuration for a whole client, in milliseconds.
///
/// Every field is optional and falls back to the component default, so an
/// empty document is valid:
///
/// ```
/// use hardened_client::ClientSettings;
///
/// let settings: ClientSettings =
///     serde_json::from_str(r#"{ "max_retries": 5, "cache_default_ttl_ms": 10000 }"#).unwrap();
/// assert_eq!(settings.max_retries, 5);
/// assert_eq!(settings.base_delay_ms, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientSettings {
    /// Name used in events, logs and metric labels.
    pub name: Option<String>,
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_ms: u64,
    pub cache_max_size: usize,
    pub cache_default_ttl_ms: u64,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            name: None,
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            jitter_ms: 100,
            cache_max_size: 1000,
            cache_default_ttl_ms: 30_000,
            rate_limit_max_requests: 60,
            rate_limit_window_ms: 60_000,
            request_timeout_ms: 10_000,
        }
    }
}

impl ClientSettings {
    pub(crate) fn retry_config(&self) -> hardened_retry::RetryConfig {
        hardened_retry::RetryConfig::builder()
            .max_retries(self.max_retries)
            .base_delay(Duration::from_millis(self.base_delay_ms))
            .max_delay(Duration::from_millis(self.max_delay_ms))
            .backoff_multiplier(self.backoff_multiplier)
            .max_jitter(Duration::from_millis(self.jitter_ms))
            .build()
    }
}
