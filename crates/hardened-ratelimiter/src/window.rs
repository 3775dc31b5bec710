use std::time::Duration;
use tokio::time::Instant;

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// Admitted into the current window.
    Admitted,
    /// Admitted as the first call of a fresh window.
    Opened,
    /// Denied; the window is full until it resets.
    Rejected,
}

/// Fixed-window counter for one identifier.
#[derive(Debug, Clone)]
pub(crate) struct RateWindow {
    count: usize,
    reset_at: Instant,
}

impl RateWindow {
    /// A window opened by an admitted call at `now`.
    pub(crate) fn open(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            reset_at: now + window,
        }
    }

    /// Counts one call against the window, resetting it first if it has
    /// lapsed. A rejected call does not count.
    pub(crate) fn admit(&mut self, now: Instant, limit: usize, window: Duration) -> Admission {
        if now > self.reset_at {
            *self = Self::open(now, window);
            return Admission::Opened;
        }
        if self.count < limit {
            self.count += 1;
            Admission::Admitted
        } else {
            Admission::Rejected
        }
    }

    #[cfg(test)]
    pub(crate) fn count(&self) -> usize {
        self.count
    }
}
