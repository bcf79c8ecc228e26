//! Process-wide connection state shown to the user.

/// Connection state owned by the lifecycle controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Pairing,
    Connected,
    Degraded(String),
    ShuttingDown,
}

impl ConnectionState {
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self::Degraded(reason.into())
    }

    /// Text for the status indicator.
    pub fn status_text(&self) -> String {
        match self {
            Self::Uninitialized => "Initializing...".to_string(),
            Self::Pairing => "Pairing...".to_string(),
            Self::Connected => "Connected and Listening".to_string(),
            Self::Degraded(reason) => reason.clone(),
            Self::ShuttingDown => "Shutting down...".to_string(),
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::Uninitialized
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.status_text())
    }
}
