use async_trait::async_trait;
use thiserror::Error;

use crate::StatusUpdate;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("status publish connection failed: {0}")]
    Connection(String),

    #[error("status publish failed: {0}")]
    Publish(String),

    #[error("status encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Publishes status updates to the responses exchange.
#[async_trait]
pub trait StatusPublisherPort: Send + Sync {
    async fn publish(&self, update: &StatusUpdate) -> Result<(), PublishError>;
}
