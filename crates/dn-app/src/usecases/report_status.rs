use std::sync::Arc;

use dn_core::ports::StatusPublisherPort;
use dn_core::StatusUpdate;
use tracing::{debug, info_span, warn, Instrument};

/// Use case for reporting a notification's status back to the backend.
///
/// Best-effort: failures are logged and dropped, never retried.
pub struct ReportStatus {
    publisher: Arc<dyn StatusPublisherPort>,
}

impl ReportStatus {
    pub fn new(publisher: Arc<dyn StatusPublisherPort>) -> Self {
        Self { publisher }
    }

    /// Returns whether the update was published.
    pub async fn execute(&self, update: StatusUpdate) -> bool {
        let span = info_span!(
            "usecase.report_status.execute",
            notification_id = %update.notification_id(),
            status = update.status().as_str(),
        );

        async {
            match self.publisher.publish(&update).await {
                Ok(()) => {
                    debug!("status reported");
                    true
                }
                Err(e) => {
                    warn!(error = %e, "failed to report status, dropping");
                    false
                }
            }
        }
        .instrument(span)
        .await
    }
}
