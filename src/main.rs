use std::process::ExitCode;
use std::time::Duration;

use desk_notifier_lib::bootstrap::{
    load_config, run_client, tracing::init_tracing_subscriber, EXIT_CONFIG_ERROR,
    EXIT_LOCAL_FAULT,
};
use tracing::error;

/// Blocking stdin reads cannot be interrupted; do not wait on them at exit.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

fn main() -> ExitCode {
    if let Err(e) = init_tracing_subscriber() {
        eprintln!("Failed to initialize tracing: {e}");
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to start async runtime");
            return ExitCode::from(EXIT_LOCAL_FAULT);
        }
    };

    let code = runtime.block_on(run_client(config));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    code
}
