//! Notifications received from the broker and the status updates they produce.

mod status;

pub use status::{DeliveryStatus, StatusUpdate};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend-assigned notification identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(i64);

impl NotificationId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notification as delivered by the broker.
///
/// Transient: it lives only while it is being presented and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub sender: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum NotificationDecodeError {
    #[error("notification body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Wire shape of a message published on the notifications exchange.
#[derive(Debug, Deserialize)]
struct NotificationMessage {
    notification_id: i64,
    #[serde(default)]
    sender_user: Option<String>,
    #[serde(default)]
    notification_content: Option<String>,
}

impl Notification {
    pub fn new(id: NotificationId, sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            sender: sender.into(),
            content: content.into(),
        }
    }

    /// Decode a message body from the notifications exchange.
    ///
    /// Missing sender or content decode as empty strings; a missing
    /// `notification_id` is a decode error.
    pub fn decode(body: &[u8]) -> Result<Self, NotificationDecodeError> {
        let message: NotificationMessage = serde_json::from_slice(body)?;
        Ok(Self {
            id: NotificationId::new(message.notification_id),
            sender: message.sender_user.unwrap_or_default(),
            content: message.notification_content.unwrap_or_default(),
        })
    }
}
