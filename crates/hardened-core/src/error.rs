//! The error type shared by every hardened-fetch component.
//!
//! [`FetchError`] is what a `HardenedClient` call returns, and what the
//! retry executor inspects (through [`Classify`]) to decide whether another
//! attempt is worthwhile. The variants map onto four failure families:
//!
//! | Family | Variants | Retried |
//! |---|---|---|
//! | admission denied | [`FetchError::RateLimited`] | never |
//! | retryable transport failure | [`FetchError::Transport`], [`FetchError::Timeout`], [`FetchError::Http`] with 408/429/5xx | yes |
//! | non-retryable failure | [`FetchError::Http`] with other codes, [`FetchError::Decode`], [`FetchError::InvalidUrl`] | never |
//! | cancellation | [`FetchError::Cancelled`] | never |
//!
//! [`FetchError::Other`] carries failures from arbitrary operations that have
//! no typed origin; those are classified by their message.
//!
//! # Examples
//!
//! ```
//! use hardened_core::{Classify, FetchError};
//!
//! let err = FetchError::http(503);
//! assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
//! assert!(err.is_retryable());
//!
//! let err = FetchError::http(404);
//! assert!(!err.is_retryable());
//! assert_eq!(err.status_code(), Some(404));
//! ```

use crate::classify::{is_retryable_status, message_indicates_network_failure, Classify};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Convenience alias for results produced by hardened-fetch components.
pub type Result<T, E = FetchError> = std::result::Result<T, E>;

/// What went wrong below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection could not be established.
    Connect,
    /// The transport's own deadline fired.
    Timeout,
    /// The request was sent but reading the response failed.
    Body,
    /// Anything else the transport reported.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// Marker produced when a caller-imposed deadline or cancel signal fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("operation cancelled by caller")
    }
}

impl std::error::Error for Cancelled {}

/// Terminal failure of an outbound call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The rate limiter refused admission for this identifier.
    #[error("Rate limit exceeded for {identifier}")]
    RateLimited {
        /// Identifier (usually the host) whose window is exhausted.
        identifier: String,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {reason}")]
    Http {
        /// Response status code.
        status: u16,
        /// Canonical reason phrase, empty when the code has none.
        reason: String,
    },

    /// The transport failed before a status was available.
    #[error("network failure ({kind}): {message}")]
    Transport {
        /// Failure category reported by the transport.
        kind: TransportErrorKind,
        /// Transport-specific detail.
        message: String,
    },

    /// A single attempt exceeded the per-attempt deadline.
    #[error("request timed out after {after:?}")]
    Timeout {
        /// The deadline that elapsed.
        after: Duration,
    },

    /// A 2xx response body could not be decoded.
    #[error("malformed response body: {0}")]
    Decode(String),

    /// The target URL could not be parsed or has no host.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl {
        /// The offending input.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The caller cancelled the call or its outer deadline elapsed.
    #[error("{0}")]
    Cancelled(Cancelled),

    /// A failure from an operation with no typed origin.
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Builds an [`FetchError::Http`] with the canonical reason phrase for `status`.
    pub fn http(status: u16) -> Self {
        FetchError::Http {
            status,
            reason: canonical_reason(status).to_string(),
        }
    }

    /// Builds a [`FetchError::Transport`].
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        FetchError::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Builds a [`FetchError::Other`] from any message.
    pub fn other(message: impl Into<String>) -> Self {
        FetchError::Other(message.into())
    }

    /// Returns `true` if this is an admission rejection.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }

    /// Returns `true` if the caller cancelled the call.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled(_))
    }

    /// Returns `true` if a per-attempt deadline fired.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout { .. }
                | FetchError::Transport {
                    kind: TransportErrorKind::Timeout,
                    ..
                }
        )
    }
}

impl From<Cancelled> for FetchError {
    fn from(c: Cancelled) -> Self {
        FetchError::Cancelled(c)
    }
}

impl Classify for FetchError {
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http { status, .. } => is_retryable_status(*status),
            FetchError::Transport { .. } | FetchError::Timeout { .. } => true,
            FetchError::Other(message) => message_indicates_network_failure(message),
            FetchError::RateLimited { .. }
            | FetchError::Decode(_)
            | FetchError::InvalidUrl { .. }
            | FetchError::Cancelled(_) => false,
        }
    }

    fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn is_cancellation(&self) -> bool {
        self.is_cancelled()
    }
}

fn canonical_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}
