//! Hand-off from the consumer to the UI.
//!
//! Background tasks never touch presentation state. They enqueue notifications
//! on a [`PresentationQueue`]; the [`PresentationLoop`] owns the presenter and
//! renders them one at a time, in arrival order.

use std::sync::Arc;

use dn_core::ports::PresenterPort;
use dn_core::{Notification, StatusUpdate};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use super::ReportStatus;

/// Sending half held by the consumer.
#[derive(Debug, Clone)]
pub struct PresentationQueue {
    tx: mpsc::UnboundedSender<Notification>,
}

/// Receiving half owned by the presentation loop.
pub type PresentationReceiver = mpsc::UnboundedReceiver<Notification>;

impl PresentationQueue {
    pub fn channel() -> (Self, PresentationReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns `false` when the presentation loop has gone away.
    pub fn enqueue(&self, notification: Notification) -> bool {
        self.tx.send(notification).is_ok()
    }
}

/// The UI side: drains the queue and reports what the user did.
pub struct PresentationLoop {
    rx: PresentationReceiver,
    presenter: Arc<dyn PresenterPort>,
    report: Arc<ReportStatus>,
    cancel: CancellationToken,
}

impl PresentationLoop {
    pub fn new(
        rx: PresentationReceiver,
        presenter: Arc<dyn PresenterPort>,
        report: Arc<ReportStatus>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            rx,
            presenter,
            report,
            cancel,
        }
    }

    pub async fn run(mut self) {
        loop {
            let notification = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                next = self.rx.recv() => match next {
                    Some(notification) => notification,
                    None => break,
                },
            };

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = self.present_one(notification) => {}
            }
        }
        debug!("presentation loop stopped");
    }

    async fn present_one(&self, notification: Notification) {
        let span = info_span!("usecase.present_notification", notification_id = %notification.id);

        async {
            info!(sender = %notification.sender, "presenting notification");
            match self.presenter.present(&notification).await {
                Ok(outcome) => {
                    let update = StatusUpdate::from_reply(notification.id, outcome.reply);
                    self.report.execute(update).await;
                }
                Err(e) => {
                    warn!(error = %e, "presenter failed, no read status reported");
                }
            }
        }
        .instrument(span)
        .await
    }
}
