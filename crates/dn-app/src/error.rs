use thiserror::Error;

/// Unrecoverable local problem. Surfaced to the operator; never retried.
#[derive(Debug, Error)]
pub enum LocalFault {
    #[error("cannot persist pairing token: {0}")]
    TokenNotPersisted(String),

    #[error("internal state machine error: {0}")]
    StateMachine(String),
}
