use std::process::ExitCode;

use dn_core::config::ClientConfig;
use tracing::{error, info};

use super::wiring::wire_lifecycle;

/// Unrecoverable local problem found while running.
pub const EXIT_LOCAL_FAULT: u8 = 1;
/// Configuration could not be loaded.
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Run the client until Ctrl-C / SIGTERM or a local fault.
pub async fn run_client(config: ClientConfig) -> ExitCode {
    let controller = match wire_lifecycle(&config) {
        Ok(controller) => controller,
        Err(e) => {
            error!(error = %format!("{e:#}"), "failed to start");
            return ExitCode::from(EXIT_LOCAL_FAULT);
        }
    };

    info!(
        api_base_url = %config.api_base_url,
        broker = %format!("{}:{}", config.broker.host, config.broker.port),
        "desk notifier starting"
    );

    match controller.run(shutdown_signal()).await {
        Ok(()) => {
            info!("desk notifier stopped");
            ExitCode::SUCCESS
        }
        Err(fault) => {
            error!(error = %fault, "desk notifier stopped on a local fault");
            ExitCode::from(EXIT_LOCAL_FAULT)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C"),
        _ = terminate => info!("received SIGTERM"),
    }
}
