//! Broker port - abstracts the notifications exchange subscription.

use async_trait::async_trait;
use thiserror::Error;

use crate::consumer::FailureKind;
use crate::Token;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrokerError {
    /// The broker closed the channel, which it does when the token's queue
    /// or binding is no longer acceptable.
    #[error("channel closed by broker: {0}")]
    ChannelClosed(String),

    #[error("broker connection error: {0}")]
    Connection(String),

    #[error("broker error: {0}")]
    Other(String),
}

impl BrokerError {
    pub fn is_auth_stale(&self) -> bool {
        matches!(self, Self::ChannelClosed(_))
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::ChannelClosed(_) => FailureKind::AuthStale,
            Self::Connection(_) => FailureKind::ConnectionLost,
            Self::Other(_) => FailureKind::Unexpected,
        }
    }
}

/// A raw delivery from the token queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub delivery_tag: u64,
    pub body: Vec<u8>,
}

impl InboundMessage {
    pub fn new(delivery_tag: u64, body: impl Into<Vec<u8>>) -> Self {
        Self {
            delivery_tag,
            body: body.into(),
        }
    }
}

/// Binds the durable per-token queue to the notifications exchange.
#[async_trait]
pub trait NotificationBrokerPort: Send + Sync {
    /// Declare `queue_{token}`, bind it with the token as routing key and start
    /// consuming from it.
    async fn subscribe(&self, token: &Token) -> Result<Box<dyn NotificationSubscription>, BrokerError>;
}

/// A live consumption on one broker connection.
#[async_trait]
pub trait NotificationSubscription: Send {
    /// Wait for the next delivery. Blocks until a message arrives or the
    /// connection fails.
    async fn next_message(&mut self) -> Result<InboundMessage, BrokerError>;

    async fn ack(&mut self, delivery_tag: u64) -> Result<(), BrokerError>;

    /// Release the underlying connection. Idempotent.
    async fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds() {
        assert_eq!(
            BrokerError::ChannelClosed("404".into()).failure_kind(),
            FailureKind::AuthStale
        );
        assert_eq!(
            BrokerError::Connection("reset".into()).failure_kind(),
            FailureKind::ConnectionLost
        );
        assert_eq!(BrokerError::Other("?".into()).failure_kind(), FailureKind::Unexpected);
        assert!(BrokerError::ChannelClosed(String::new()).is_auth_stale());
        assert!(!BrokerError::Connection(String::new()).is_auth_stale());
    }
}
