//! Device pairing token.

use serde::{Deserialize, Serialize};

const QUEUE_NAME_PREFIX: &str = "queue_";

/// Opaque per-device identity issued by the backend.
///
/// The token doubles as the broker routing key and names the durable queue
/// this device consumes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Routing key used when binding the notifications queue.
    pub fn routing_key(&self) -> &str {
        &self.0
    }

    /// Durable queue name derived from the token.
    pub fn queue_name(&self) -> String {
        format!("{QUEUE_NAME_PREFIX}{}", self.0)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
