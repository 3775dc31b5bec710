//! Core infrastructure for hardened-fetch.
//!
//! This crate holds what every other hardened-fetch crate shares:
//! - [`FetchError`], the terminal failure type of an outbound call
//! - [`Classify`], which tells the retry executor whether a failure is retryable
//! - the event listener system used by component config builders

pub mod classify;
pub mod error;
pub mod events;

pub use classify::{is_retryable_status, message_indicates_network_failure, Classify};
pub use error::{Cancelled, FetchError, Result, TransportErrorKind};
pub use events::{EventListener, EventListeners, FetchEvent, FnListener};
