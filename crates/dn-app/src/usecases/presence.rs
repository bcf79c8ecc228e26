//! Liveness reporting: periodic heartbeat and the one-shot sign-out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dn_core::ports::{HostInfoPort, PresencePort};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

/// Posts a heartbeat on a fixed interval for the lifetime of the process.
///
/// The first beat goes out immediately. Failures are logged and never stop the
/// timer.
pub struct HeartbeatEmitter {
    presence: Arc<dyn PresencePort>,
    host: Arc<dyn HostInfoPort>,
    interval: Duration,
    cancel: CancellationToken,
}

impl HeartbeatEmitter {
    pub fn new(
        presence: Arc<dyn PresencePort>,
        host: Arc<dyn HostInfoPort>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            presence,
            host,
            interval,
            cancel,
        }
    }

    pub async fn run(&self) {
        let span = info_span!("usecase.heartbeat.run", interval_secs = self.interval.as_secs());

        async {
            let hostname = self.host.hostname();
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let result = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break,
                    result = self.presence.heartbeat(&hostname) => result,
                };

                match result {
                    Ok(()) => debug!("heartbeat sent"),
                    Err(e) => warn!(error = %e, "heartbeat failed"),
                }
            }
            debug!("heartbeat stopped");
        }
        .instrument(span)
        .await
    }
}

/// Best-effort sign-out, sent at most once per process.
pub struct SignOut {
    presence: Arc<dyn PresencePort>,
    host: Arc<dyn HostInfoPort>,
    sent: AtomicBool,
}

impl SignOut {
    pub fn new(presence: Arc<dyn PresencePort>, host: Arc<dyn HostInfoPort>) -> Self {
        Self {
            presence,
            host,
            sent: AtomicBool::new(false),
        }
    }

    /// Returns `false` if sign-out was already attempted.
    pub async fn execute(&self) -> bool {
        if self.sent.swap(true, Ordering::SeqCst) {
            return false;
        }

        let span = info_span!("usecase.sign_out.execute");
        async {
            match self.presence.sign_out(&self.host.hostname()).await {
                Ok(()) => info!("sent sign out"),
                Err(e) => warn!(error = %e, "sign out failed"),
            }
        }
        .instrument(span)
        .await;
        true
    }
}
