use crate::ConnectionState;

/// User-visible connection status indicator.
pub trait StatusDisplayPort: Send + Sync {
    fn show(&self, state: &ConnectionState);
}
