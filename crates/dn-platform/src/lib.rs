//! Platform adapters: what the machine is called, where it sits on the LAN,
//! and a terminal rendition of the notification UI.

pub mod host;
pub mod net_utils;
pub mod presenter;
pub mod status_display;

pub use host::SystemHostInfo;
pub use presenter::TerminalPresenter;
pub use status_display::TracingStatusDisplay;
