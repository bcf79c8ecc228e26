//! Retry timing for pairing and reconnection.

use std::time::Duration;

/// First pairing retry delay.
pub const PAIRING_INITIAL_DELAY: Duration = Duration::from_secs(5);

/// Upper bound for the pairing retry delay.
pub const PAIRING_MAX_DELAY: Duration = Duration::from_secs(60);

/// Fixed delay before rebinding after a lost broker connection, and before
/// retrying a failed re-pair.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Doubling backoff with a cap: 5, 10, 20, 40, 60, 60, ... seconds.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    max: Duration,
    next: Duration,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            max,
            next: initial.min(max),
        }
    }

    /// Backoff used between pairing attempts.
    pub fn pairing() -> Self {
        Self::new(PAIRING_INITIAL_DELAY, PAIRING_MAX_DELAY)
    }

    /// Delay to wait after the current failure. Advances the sequence.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = delay.saturating_mul(2).min(self.max);
        delay
    }
}
