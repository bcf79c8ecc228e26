//! Broker adapters over AMQP 0-9-1.
//!
//! Every subscription and every status publish opens its own connection.
//! Connections are never shared between tasks.

mod connection;
mod consumer;
mod publisher;

pub use consumer::AmqpNotificationBroker;
pub use publisher::AmqpStatusPublisher;
