use crate::health::{CacheStats, HealthReport, RateLimitStats};
use crate::request::RequestOptions;
use crate::settings::ClientSettings;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, TransportError};
use hardened_cache::TtlCache;
use hardened_core::FetchError;
use hardened_metrics::{HealthStatus, MetricsCollector, MetricsConfig};
use hardened_ratelimiter::RateLimiter;
use hardened_retry::{RetryConfig, RetryExecutor};
use http::header::{HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tower::{Service, ServiceExt};
use url::Url;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Deadline applied to every transport attempt.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound HTTP client that rate limits, caches, retries and records
/// health metrics around every call.
///
/// A call goes through these steps in order:
///
/// 1. The URL's host is checked against the rate limiter. A denied call
///    fails with [`FetchError::RateLimited`] without touching the cache,
///    the network or the metrics.
/// 2. With a cache key, a live cached value is returned as is.
/// 3. The retry executor sends the request, each attempt bounded by the
///    request timeout. Non-2xx statuses become [`FetchError::Http`] and
///    unparseable bodies [`FetchError::Decode`].
/// 4. With a cache key, a successful body is cached.
///
/// The client is cheap to clone if its transport is; clones share the
/// cache, the rate limiter and the metrics.
#[derive(Clone)]
pub struct HardenedClient<S = ReqwestTransport> {
    transport: S,
    executor: RetryExecutor,
    cache: TtlCache<Value>,
    limiter: RateLimiter,
    request_timeout: Duration,
    name: String,
}

impl<S> fmt::Debug for HardenedClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HardenedClient")
            .field("name", &self.name)
            .field("executor", &self.executor)
            .field("cache", &self.cache)
            .field("limiter", &self.limiter)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl HardenedClient<ReqwestTransport> {
    /// A client with default settings over a fresh [`ReqwestTransport`].
    pub fn reqwest() -> Result<Self, TransportError> {
        Ok(Self::builder(ReqwestTransport::new()?).build())
    }
}

impl<S> HardenedClient<S>
where
    S: Service<HttpRequest, Response = HttpResponse, Error = TransportError> + Clone,
{
    /// A client with default settings over `transport`.
    pub fn new(transport: S) -> Self {
        Self::builder(transport).build()
    }

    /// Starts a builder over `transport`.
    pub fn builder(transport: S) -> HardenedClientBuilder<S> {
        HardenedClientBuilder::new(transport)
    }

    /// Fetches `url` and decodes its JSON body into `T`.
    ///
    /// With `cache_key`, a live cached body is served without a request and
    /// a fresh one is cached for `cache_ttl` (or the cache default).
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
        cache_key: Option<&str>,
        cache_ttl: Option<Duration>,
    ) -> Result<T, FetchError> {
        self.fetch_until(url, options, cache_key, cache_ttl, std::future::pending())
            .await
    }

    /// Like [`fetch`](Self::fetch), but gives up with
    /// [`FetchError::Cancelled`] once `cancel` completes.
    ///
    /// Pass `tokio::time::sleep(limit)` for an overall deadline.
    pub async fn fetch_cancellable<T, C>(
        &self,
        url: &str,
        options: RequestOptions,
        cache_key: Option<&str>,
        cache_ttl: Option<Duration>,
        cancel: C,
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        C: Future<Output = ()>,
    {
        self.fetch_until(url, options, cache_key, cache_ttl, cancel)
            .await
    }

    /// `GET` without caching.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.fetch(url, RequestOptions::new(), None, None).await
    }

    /// `GET` cached under `cache_key` for `ttl` (or the cache default).
    pub async fn get_cached<T: DeserializeOwned>(
        &self,
        url: &str,
        cache_key: &str,
        ttl: Option<Duration>,
    ) -> Result<T, FetchError> {
        self.fetch(url, RequestOptions::new(), Some(cache_key), ttl)
            .await
    }

    async fn fetch_until<T, C>(
        &self,
        url: &str,
        options: RequestOptions,
        cache_key: Option<&str>,
        cache_ttl: Option<Duration>,
        cancel: C,
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        C: Future<Output = ()>,
    {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let host = url
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl {
                url: url.to_string(),
                reason: "missing host".to_string(),
            })?
            .to_string();

        if let Err(err) = self.limiter.try_acquire(&host) {
            #[cfg(feature = "tracing")]
            warn!(client = %self.name, host = %host, "Request rejected by rate limiter");
            return Err(err.into());
        }

        if let Some(key) = cache_key {
            if let Some(value) = self.cache.get(key) {
                #[cfg(feature = "tracing")]
                debug!(client = %self.name, key, "Serving response from cache");
                return decode(&value);
            }
        }

        let RequestOptions {
            method,
            mut headers,
            body,
            retry,
        } = options;
        if !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }
        let request = HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: self.request_timeout,
        };
        let config = retry.as_ref().unwrap_or_else(|| self.executor.config());
        let timeout = self.request_timeout;

        let (value, typed) = self
            .executor
            .execute_until(config, &host, cancel, || {
                attempt::<S, T>(self.transport.clone(), request.clone(), timeout)
            })
            .await?;

        if let Some(key) = cache_key {
            let ttl = cache_ttl.unwrap_or_else(|| self.cache.config().default_ttl());
            self.cache.set(key, value, ttl);
        }
        Ok(typed)
    }

    /// Current status, metrics, cache and rate-limit usage.
    pub fn health_report(&self) -> HealthReport {
        let metrics = self.metrics().snapshot();
        let timestamp_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        HealthReport {
            status: metrics.health_status(),
            metrics,
            cache: CacheStats {
                size: self.cache.len(),
                max_size: self.cache.max_size(),
                utilization_percent: self.cache.utilization_percent(),
            },
            rate_limit: RateLimitStats {
                active_window_count: self.limiter.active_windows(),
            },
            timestamp_millis,
        }
    }

    /// Health derived from the rolling success rate.
    pub fn health_status(&self) -> HealthStatus {
        self.metrics().health_status()
    }

    /// Clears the cache, rate windows and recorded outcomes.
    pub fn reset(&self) {
        self.cache.clear();
        self.limiter.reset();
        self.metrics().reset();
    }
}

impl<S> HardenedClient<S> {
    /// The collector every call is recorded in; the executor's own.
    pub fn metrics(&self) -> &MetricsCollector {
        self.executor.metrics()
    }

    /// The response cache, keyed by the caller's cache keys.
    pub fn cache(&self) -> &TtlCache<Value> {
        &self.cache
    }

    /// The limiter calls are admitted through, one window per host.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn executor(&self) -> &RetryExecutor {
        &self.executor
    }

    /// Deadline applied to each attempt.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

async fn attempt<S, T>(
    transport: S,
    request: HttpRequest,
    timeout: Duration,
) -> Result<(Value, T), FetchError>
where
    S: Service<HttpRequest, Response = HttpResponse, Error = TransportError>,
    T: DeserializeOwned,
{
    let response = match tokio::time::timeout(timeout, transport.oneshot(request)).await {
        Ok(result) => result?,
        Err(_) => return Err(FetchError::Timeout { after: timeout }),
    };
    if !response.status.is_success() {
        return Err(FetchError::http(response.status.as_u16()));
    }

    let value: Value =
        serde_json::from_slice(&response.body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let typed = decode(&value)?;
    Ok((value, typed))
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, FetchError> {
    T::deserialize(value).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Builder for [`HardenedClient`].
///
/// Components not supplied explicitly are built from the configured values,
/// all named after the client.
pub struct HardenedClientBuilder<S> {
    transport: S,
    name: String,
    settings: ClientSettings,
    retry_config: Option<RetryConfig>,
    executor: Option<RetryExecutor>,
    cache: Option<TtlCache<Value>>,
    limiter: Option<RateLimiter>,
    metrics: Option<MetricsCollector>,
}

impl<S> HardenedClientBuilder<S> {
    /// Creates a builder with default values.
    pub fn new(transport: S) -> Self {
        Self {
            transport,
            name: String::from("<unnamed>"),
            settings: ClientSettings::default(),
            retry_config: None,
            executor: None,
            cache: None,
            limiter: None,
            metrics: None,
        }
    }

    /// Sets the client name used in events, logs and metric labels.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Applies start-up settings. Explicit components still take precedence.
    pub fn settings(mut self, settings: ClientSettings) -> Self {
        if let Some(name) = &settings.name {
            self.name = name.clone();
        }
        self.settings = settings;
        self
    }

    /// Default retry config for every call.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Per-attempt deadline. Default: 10 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Uses a preconfigured executor, including its metrics collector.
    ///
    /// The executor keeps its own retry config and collector, so
    /// [`retry_config`](Self::retry_config) and [`metrics`](Self::metrics)
    /// are ignored when this is set.
    pub fn executor(mut self, executor: RetryExecutor) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Uses a shared cache.
    pub fn cache(mut self, cache: TtlCache<Value>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Uses a shared rate limiter.
    pub fn rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Records outcomes into an existing collector.
    ///
    /// Has no effect together with [`executor`](Self::executor); the
    /// executor's collector wins.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Builds the client.
    pub fn build(self) -> HardenedClient<S> {
        let settings = self.settings;
        let name = self.name;

        let executor = match self.executor {
            Some(executor) => {
                #[cfg(feature = "tracing")]
                if self.metrics.is_some() {
                    warn!(
                        client = %name,
                        "Explicit executor supplied, ignoring the separate metrics collector"
                    );
                }
                executor
            }
            None => {
                let metrics = self
                    .metrics
                    .unwrap_or_else(|| MetricsConfig::builder().name(name.clone()).build());
                RetryExecutor::builder()
                    .config(
                        self.retry_config
                            .unwrap_or_else(|| settings.retry_config()),
                    )
                    .metrics(metrics)
                    .name(name.clone())
                    .build()
            }
        };

        let cache = self.cache.unwrap_or_else(|| {
            TtlCache::builder()
                .max_size(settings.cache_max_size)
                .default_ttl(Duration::from_millis(settings.cache_default_ttl_ms))
                .name(name.clone())
                .build()
        });

        let limiter = self.limiter.unwrap_or_else(|| {
            RateLimiter::builder()
                .limit(settings.rate_limit_max_requests)
                .window(Duration::from_millis(settings.rate_limit_window_ms))
                .name(name.clone())
                .build()
        });

        HardenedClient {
            transport: self.transport,
            executor,
            cache,
            limiter,
            request_timeout: Duration::from_millis(settings.request_timeout_ms),
            name,
        }
    }
}
