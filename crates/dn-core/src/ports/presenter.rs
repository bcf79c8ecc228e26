use async_trait::async_trait;
use thiserror::Error;

use crate::Notification;

/// What the user did with a presented notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationOutcome {
    /// Reply text as typed, if any.
    pub reply: Option<String>,
}

impl PresentationOutcome {
    pub fn acknowledged() -> Self {
        Self { reply: None }
    }

    pub fn replied(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("presenter unavailable: {0}")]
    Unavailable(String),
}

/// UI collaborator that blocks until the user acknowledges a notification.
///
/// Only ever called from the presentation loop, one notification at a time.
#[async_trait]
pub trait PresenterPort: Send + Sync {
    async fn present(&self, notification: &Notification) -> Result<PresentationOutcome, PresenterError>;
}
