//! Failure classification.
//!
//! The retry executor only needs to know three things about a failure: may it
//! be retried, did it carry an HTTP status, and was it a caller cancellation.
//! [`Classify`] answers those questions for any error type.

/// Case-insensitive substrings that mark an untyped failure as a network failure.
pub const NETWORK_FAILURE_INDICATORS: &[&str] = &["network", "fetch"];

/// Decides how the retry executor treats a failure.
pub trait Classify {
    /// Returns `true` if another attempt may succeed.
    fn is_retryable(&self) -> bool;

    /// The HTTP status carried by the failure, if any.
    fn status_code(&self) -> Option<u16> {
        None
    }

    /// Returns `true` if the failure is a caller-initiated cancellation.
    fn is_cancellation(&self) -> bool {
        false
    }
}

/// Returns `true` for 408, 429 and every 5xx status.
pub fn is_retryable_status(status: u16) -> bool {
    status == 408 || status == 429 || status >= 500
}

/// Returns `true` if `message` contains one of [`NETWORK_FAILURE_INDICATORS`].
///
/// This is a permissive heuristic: unfamiliar wording from a network library
/// is classified as non-retryable.
pub fn message_indicates_network_failure(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    NETWORK_FAILURE_INDICATORS
        .iter()
        .any(|needle| lowered.contains(needle))
}
