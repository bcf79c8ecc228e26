use async_trait::async_trait;
use thiserror::Error;

use crate::{DeviceIdentity, Token};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PairError {
    /// Timeout or connection failure.
    #[error("pairing endpoint unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with a non-success status.
    #[error("pairing rejected by backend (HTTP {status})")]
    Rejected { status: u16 },

    /// Success status but no usable token in the body.
    #[error("pairing response invalid: {0}")]
    InvalidResponse(String),
}

/// Exchanges device identity for a token with the backend.
#[async_trait]
pub trait PairingPort: Send + Sync {
    async fn pair(&self, identity: &DeviceIdentity) -> Result<Token, PairError>;
}
