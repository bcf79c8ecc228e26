//! Queue consumer state machine.
//!
//! Defines a pure state transition function for the broker consumption loop.
//! The runner in `dn-app` executes the returned actions in order; the last
//! action of every list is the one whose outcome becomes the next event.

use std::time::Duration;

use crate::connection::ConnectionState;
use crate::retry::RECONNECT_DELAY;

pub const STATUS_AUTH_STALE: &str = "Token invalid or expired. Re-pairing...";
pub const STATUS_CONNECTION_LOST: &str = "Connection lost, reconnecting...";
pub const STATUS_UNEXPECTED: &str = "Unexpected error, reconnecting...";
pub const STATUS_REPAIR_FAILED: &str = "Re-pairing failed, retrying...";

/// Consumer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    /// Declaring and binding the token queue.
    Binding,
    /// Receiving notifications.
    Consuming,
    /// Waiting to rebind with the same token.
    Reconnecting,
    /// Obtaining a fresh token after the broker rejected the current one.
    ReAuthenticating,
    /// Terminal. The connection has been released.
    Stopped,
}

/// How a broker operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The broker closed the channel: the token is no longer valid.
    AuthStale,
    /// The connection dropped or could not be established.
    ConnectionLost,
    /// Anything else the broker client reported.
    Unexpected,
}

/// Events that drive the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerEvent {
    Bound,
    BrokerFailed(FailureKind),
    /// A reconnect or re-pair wait elapsed.
    RetryDue,
    RePaired,
    RePairFailed,
    Cancelled,
}

/// Side-effects produced by state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerAction {
    /// Bind the queue for the current token and start a subscription.
    Subscribe,
    /// Receive messages until the subscription fails.
    Consume,
    /// Close the current subscription, if any.
    Release,
    /// Cancellable wait.
    Wait(Duration),
    /// Pair again and persist the new token.
    RePair,
    ShowStatus(ConnectionState),
}

/// Pure consumer state machine: contains no side-effects.
pub struct ConsumerStateMachine;

impl ConsumerStateMachine {
    /// Entry point: bind with whatever token is current.
    pub fn start() -> (ConsumerState, Vec<ConsumerAction>) {
        (ConsumerState::Binding, vec![ConsumerAction::Subscribe])
    }

    pub fn transition(
        state: ConsumerState,
        event: ConsumerEvent,
    ) -> (ConsumerState, Vec<ConsumerAction>) {
        match (state, event) {
            (ConsumerState::Stopped, _) => (ConsumerState::Stopped, Vec::new()),
            (_, ConsumerEvent::Cancelled) => {
                (ConsumerState::Stopped, vec![ConsumerAction::Release])
            }
            (ConsumerState::Binding, ConsumerEvent::Bound) => (
                ConsumerState::Consuming,
                vec![
                    ConsumerAction::ShowStatus(ConnectionState::Connected),
                    ConsumerAction::Consume,
                ],
            ),
            (
                ConsumerState::Binding | ConsumerState::Consuming,
                ConsumerEvent::BrokerFailed(FailureKind::AuthStale),
            ) => (
                ConsumerState::ReAuthenticating,
                vec![
                    ConsumerAction::Release,
                    ConsumerAction::ShowStatus(ConnectionState::degraded(STATUS_AUTH_STALE)),
                    ConsumerAction::RePair,
                ],
            ),
            (
                ConsumerState::Binding | ConsumerState::Consuming,
                ConsumerEvent::BrokerFailed(kind),
            ) => {
                let reason = match kind {
                    FailureKind::Unexpected => STATUS_UNEXPECTED,
                    _ => STATUS_CONNECTION_LOST,
                };
                (
                    ConsumerState::Reconnecting,
                    vec![
                        ConsumerAction::Release,
                        ConsumerAction::ShowStatus(ConnectionState::degraded(reason)),
                        ConsumerAction::Wait(RECONNECT_DELAY),
                    ],
                )
            }
            (ConsumerState::Reconnecting, ConsumerEvent::RetryDue) => {
                (ConsumerState::Binding, vec![ConsumerAction::Subscribe])
            }
            (ConsumerState::ReAuthenticating, ConsumerEvent::RePaired) => {
                (ConsumerState::Binding, vec![ConsumerAction::Subscribe])
            }
            (ConsumerState::ReAuthenticating, ConsumerEvent::RePairFailed) => (
                ConsumerState::ReAuthenticating,
                vec![
                    ConsumerAction::ShowStatus(ConnectionState::degraded(STATUS_REPAIR_FAILED)),
                    ConsumerAction::Wait(RECONNECT_DELAY),
                ],
            ),
            (ConsumerState::ReAuthenticating, ConsumerEvent::RetryDue) => {
                (ConsumerState::ReAuthenticating, vec![ConsumerAction::RePair])
            }
            // Event not meaningful in this state.
            (state, _) => (state, Vec::new()),
        }
    }
}
