//! Hardened outbound HTTP for price quotes, market data and chain queries.
//!
//! [`HardenedClient`] wires the hardened-fetch components around one
//! outbound call:
//!
//! - **Rate limiting** per host (`hardened-ratelimiter`)
//! - **TTL caching** of decoded JSON bodies (`hardened-cache`)
//! - **Retries** with capped exponential backoff and jitter
//!   (`hardened-retry`), each attempt bounded by a 10 second deadline
//! - **Health metrics** over a rolling 5 minute window (`hardened-metrics`)
//!
//! The network sits behind a `tower::Service` ([`HttpRequest`] in,
//! [`HttpResponse`] out); [`ReqwestTransport`] is the production one.
//!
//! # Examples
//!
//! ```no_run
//! use hardened_client::{cache_key, HardenedClient, QUOTE_TTL};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Quote {
//!     price: f64,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HardenedClient::reqwest()?;
//!
//! let key = cache_key("quote", [("from", "ETH"), ("to", "USDC")]);
//! let quote: Quote = client
//!     .get_cached("https://api.example.com/quote?from=ETH&to=USDC", &key, Some(QUOTE_TTL))
//!     .await?;
//! println!("ETH/USDC {}", quote.price);
//!
//! println!("{}", serde_json::to_string(&client.health_report())?);
//! # Ok(())
//! # }
//! ```

mod client;
mod health;
mod key;
mod request;
mod settings;
mod transport;

pub use client::{HardenedClient, HardenedClientBuilder, DEFAULT_REQUEST_TIMEOUT};
pub use health::{CacheStats, HealthReport, RateLimitStats};
pub use key::cache_key;
pub use request::RequestOptions;
pub use settings::ClientSettings;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, TransportError};

pub use hardened_cache::{MARKET_DATA_TTL, QUOTE_TTL};
pub use hardened_core::{Classify, FetchError, TransportErrorKind};
pub use hardened_metrics::{HealthStatus, Metrics};
pub use hardened_retry::RetryConfig;
