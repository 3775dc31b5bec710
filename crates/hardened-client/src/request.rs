use bytes::Bytes;
use hardened_core::FetchError;
use hardened_retry::RetryConfig;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method};
use serde::Serialize;

/// Per-call request options.
///
/// Defaults to a `GET` with no body under the client's retry config.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub(crate) method: Method,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Bytes>,
    pub(crate) retry: Option<RetryConfig>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a `POST` with a JSON body.
    pub fn post_json<B: Serialize>(body: &B) -> Result<Self, FetchError> {
        Self::new().method(Method::POST).json(body)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds a header, replacing any previous value under the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `body` as the JSON request body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, FetchError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| FetchError::other(format!("request body serialization: {e}")))?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(Bytes::from(bytes));
        Ok(self)
    }

    /// Overrides the client's retry config for this call only.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = Some(config);
        self
    }
}
