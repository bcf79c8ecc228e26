//! # dn-core
//!
//! Core domain models and business logic for Desk Notifier.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod config;
pub mod connection;
pub mod consumer;
pub mod device;
pub mod notification;
pub mod ports;
pub mod retry;
pub mod token;

// Re-export commonly used types at the crate root
pub use config::{BrokerConfig, ClientConfig};
pub use connection::ConnectionState;
pub use consumer::{ConsumerAction, ConsumerEvent, ConsumerState, ConsumerStateMachine};
pub use device::DeviceIdentity;
pub use notification::{DeliveryStatus, Notification, NotificationId, StatusUpdate};
pub use retry::ExponentialBackoff;
pub use token::Token;
