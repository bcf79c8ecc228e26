//! Cancellation-aware timed waits.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// How a [`wait_or_cancelled`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

/// Sleep for `duration` unless `cancel` fires first.
///
/// Returns immediately when the token is already cancelled.
pub async fn wait_or_cancelled(cancel: &CancellationToken, duration: Duration) -> WaitOutcome {
    if cancel.is_cancelled() {
        return WaitOutcome::Cancelled;
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => WaitOutcome::Cancelled,
        _ = tokio::time::sleep(duration) => WaitOutcome::Elapsed,
    }
}
