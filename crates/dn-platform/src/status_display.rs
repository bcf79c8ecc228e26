use dn_core::ports::StatusDisplayPort;
use dn_core::ConnectionState;
use tracing::{info, warn};

/// Status indicator for headless and terminal runs: every change becomes a
/// log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatusDisplay;

impl StatusDisplayPort for TracingStatusDisplay {
    fn show(&self, state: &ConnectionState) {
        match state {
            ConnectionState::Degraded(_) => warn!(target: "status", "{}", state.status_text()),
            _ => info!(target: "status", "{}", state.status_text()),
        }
    }
}
