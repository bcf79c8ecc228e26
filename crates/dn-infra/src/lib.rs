//! Adapters behind the `dn-core` ports that talk to the outside world:
//! the token file, the backend HTTP API and the message broker.

pub mod amqp;
pub mod fs;
pub mod http;

pub use amqp::{AmqpNotificationBroker, AmqpStatusPublisher};
pub use fs::FileTokenStore;
pub use http::{HttpBackend, HttpExternalIp};
