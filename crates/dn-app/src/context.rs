//! Shared client context.
//!
//! One instance is built at startup and handed to every component. It carries
//! the current token, the process-wide cancellation signal and the connection
//! state holder.

use std::sync::{Arc, RwLock};

use dn_core::ports::StatusDisplayPort;
use dn_core::{ConnectionState, Token};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Current pairing token.
///
/// Many readers (consumer, status reporting); the pairing use case is the only
/// writer.
#[derive(Debug, Clone, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<Token>>>,
}

impl TokenCell {
    pub fn new(initial: Option<Token>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn get(&self) -> Option<Token> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub(crate) fn set(&self, token: Token) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(token);
    }
}

/// Connection state holder. Forwards every change to the status display.
#[derive(Clone)]
pub struct LifecycleStatus {
    state: Arc<RwLock<ConnectionState>>,
    display: Arc<dyn StatusDisplayPort>,
}

impl LifecycleStatus {
    pub fn new(display: Arc<dyn StatusDisplayPort>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ConnectionState::Uninitialized)),
            display,
        }
    }

    pub fn set(&self, state: ConnectionState) {
        {
            let mut guard = self
                .state
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if *guard == ConnectionState::ShuttingDown && state != ConnectionState::ShuttingDown {
                return;
            }
            *guard = state.clone();
        }
        info!(status = %state, "connection status changed");
        self.display.show(&state);
    }

    pub fn get(&self) -> ConnectionState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Everything a background component needs to share.
#[derive(Clone)]
pub struct ClientContext {
    pub token: TokenCell,
    pub cancel: CancellationToken,
    pub status: LifecycleStatus,
}

impl ClientContext {
    pub fn new(initial_token: Option<Token>, display: Arc<dyn StatusDisplayPort>) -> Self {
        Self {
            token: TokenCell::new(initial_token),
            cancel: CancellationToken::new(),
            status: LifecycleStatus::new(display),
        }
    }
}
