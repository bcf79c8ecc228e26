use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PresenceError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend answered HTTP {status}")]
    Rejected { status: u16 },
}

/// Liveness signals sent to the backend.
#[async_trait]
pub trait PresencePort: Send + Sync {
    async fn heartbeat(&self, hostname: &str) -> Result<(), PresenceError>;

    async fn sign_out(&self, hostname: &str) -> Result<(), PresenceError>;
}
