use thiserror::Error;

use crate::Token;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token store write failed: {0}")]
    Write(String),
}

pub trait TokenStorePort: Send + Sync {
    /// Load the persisted token. Missing or malformed storage yields `None`.
    fn load(&self) -> Option<Token>;

    /// Replace the persisted token. A failed write must leave the previous
    /// token intact.
    fn save(&self, token: &Token) -> Result<(), TokenStoreError>;
}
