//! Desk Notifier application orchestration layer
//!
//! This crate contains the use cases that pair the device, consume the token
//! queue, hand notifications to the UI and report their status, plus the
//! lifecycle controller that wires them together.

pub mod context;
pub mod error;
pub mod usecases;
pub mod wait;

pub use context::{ClientContext, LifecycleStatus, TokenCell};
pub use error::LocalFault;
pub use usecases::{
    AttemptPairingLoop, ConsumeNotifications, HeartbeatEmitter, LifecycleController,
    LifecycleDeps, PairDevice, PresentationLoop, PresentationQueue, ReportStatus, SignOut,
};
