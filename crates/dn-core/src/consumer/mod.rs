//! Queue consumer domain: states, events and the pure transition function.

mod state_machine;

pub use state_machine::{
    ConsumerAction, ConsumerEvent, ConsumerState, ConsumerStateMachine, FailureKind,
};
