use serde::Serialize;

use super::NotificationId;

/// Lifecycle of a notification as reported back to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Delivered,
    Read,
    Replied,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }
}

/// Status update published to the responses exchange.
///
/// Only `Replied` carries reply text, and that text is never blank. The
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    notification_id: NotificationId,
    status: DeliveryStatus,
    #[serde(rename = "user_response")]
    reply_text: Option<String>,
}

impl StatusUpdate {
    pub fn delivered(notification_id: NotificationId) -> Self {
        Self {
            notification_id,
            status: DeliveryStatus::Delivered,
            reply_text: None,
        }
    }

    pub fn read(notification_id: NotificationId) -> Self {
        Self {
            notification_id,
            status: DeliveryStatus::Read,
            reply_text: None,
        }
    }

    /// Build the update that follows presentation.
    ///
    /// A reply that is empty after trimming is a plain `read`.
    pub fn from_reply(notification_id: NotificationId, reply: Option<String>) -> Self {
        match reply {
            Some(text) if !text.trim().is_empty() => Self {
                notification_id,
                status: DeliveryStatus::Replied,
                reply_text: Some(text),
            },
            _ => Self::read(notification_id),
        }
    }

    pub fn notification_id(&self) -> NotificationId {
        self.notification_id
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn reply_text(&self) -> Option<&str> {
        self.reply_text.as_deref()
    }

    /// JSON body sent to the backend.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
