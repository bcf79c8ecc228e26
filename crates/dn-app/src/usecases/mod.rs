//! Use cases.

pub mod app_lifecycle;
pub mod consumer;
pub mod pairing;
pub mod presence;
pub mod presentation;
pub mod report_status;

pub use app_lifecycle::{LifecycleController, LifecycleDeps, DEFAULT_SHUTDOWN_GRACE};
pub use consumer::{ConsumeNotifications, ConsumeNotificationsDeps};
pub use pairing::{AttemptPairingLoop, PairAttemptError, PairDevice, PairDeviceDeps};
pub use presence::{HeartbeatEmitter, SignOut};
pub use presentation::{PresentationLoop, PresentationQueue, PresentationReceiver};
pub use report_status::ReportStatus;
