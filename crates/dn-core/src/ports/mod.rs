//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `dn-app` and the
//! adapters in `dn-infra` and `dn-platform`. The core never performs I/O itself.

pub mod broker;
pub mod host;
pub mod pairing;
pub mod presence;
pub mod presenter;
pub mod status_display;
pub mod status_publisher;
pub mod token_store;

pub use broker::{BrokerError, InboundMessage, NotificationBrokerPort, NotificationSubscription};
pub use host::{ExternalIpPort, HostInfoPort};
pub use pairing::{PairError, PairingPort};
pub use presence::{PresenceError, PresencePort};
pub use presenter::{PresentationOutcome, PresenterError, PresenterPort};
pub use status_display::StatusDisplayPort;
pub use status_publisher::{PublishError, StatusPublisherPort};
pub use token_store::{TokenStoreError, TokenStorePort};
