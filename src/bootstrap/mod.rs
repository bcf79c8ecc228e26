pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, ConfigError};
pub use run::{run_client, EXIT_CONFIG_ERROR, EXIT_LOCAL_FAULT};
pub use wiring::wire_lifecycle;
