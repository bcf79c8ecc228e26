use std::sync::Arc;

use dn_core::{ConnectionState, ExponentialBackoff, Token};
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use super::{PairAttemptError, PairDevice};
use crate::context::LifecycleStatus;
use crate::error::LocalFault;
use crate::wait::{wait_or_cancelled, WaitOutcome};

/// Retries [`PairDevice`] with exponential backoff until it succeeds or the
/// process is cancelled.
pub struct AttemptPairingLoop {
    pair: Arc<PairDevice>,
    cancel: CancellationToken,
    status: LifecycleStatus,
}

impl AttemptPairingLoop {
    pub fn new(pair: Arc<PairDevice>, cancel: CancellationToken, status: LifecycleStatus) -> Self {
        Self {
            pair,
            cancel,
            status,
        }
    }

    /// Returns the new token, or `None` when cancelled first.
    ///
    /// Cancellation is observed during the pairing request as well as during
    /// the backoff wait.
    pub async fn run(&self) -> Result<Option<Token>, LocalFault> {
        let span = info_span!("usecase.attempt_pairing_loop.run");

        async {
            let mut backoff = ExponentialBackoff::pairing();
            loop {
                let attempt = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        info!("pairing cancelled");
                        return Ok(None);
                    }
                    result = self.pair.execute() => result,
                };

                match attempt {
                    Ok(token) => return Ok(Some(token)),
                    Err(PairAttemptError::LocalFault(fault)) => return Err(fault),
                    Err(PairAttemptError::Pair(error)) => {
                        let delay = backoff.next_delay();
                        warn!(error = %error, retry_in_secs = delay.as_secs(), "pairing failed");
                        self.status.set(ConnectionState::degraded(format!(
                            "Pairing failed, retrying in {} seconds...",
                            delay.as_secs()
                        )));
                        if wait_or_cancelled(&self.cancel, delay).await == WaitOutcome::Cancelled {
                            info!("pairing cancelled during backoff");
                            return Ok(None);
                        }
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}
