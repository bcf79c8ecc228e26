//! Desk Notifier
//!
//! Desktop client that pairs with the notification backend, listens on its
//! per-device broker queue, shows incoming notifications and reports what the
//! user did with them.

pub mod bootstrap;
