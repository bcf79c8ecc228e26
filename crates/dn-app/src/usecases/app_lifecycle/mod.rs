//! Lifecycle controller.
//!
//! Starts the session (saved token straight to the consumer, otherwise the
//! pairing loop first), the heartbeat and the presentation loop; on shutdown
//! cancels everything, waits a bounded time, and signs out.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dn_core::ports::TokenStorePort;
use dn_core::ConnectionState;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};

use super::consumer::ConsumeNotifications;
use super::pairing::AttemptPairingLoop;
use super::presence::{HeartbeatEmitter, SignOut};
use super::presentation::PresentationLoop;
use crate::context::ClientContext;
use crate::error::LocalFault;

/// How long shutdown waits for background tasks to observe cancellation.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Helper for constructing the controller with explicit dependency fields.
pub struct LifecycleDeps {
    pub context: ClientContext,
    pub token_store: Arc<dyn TokenStorePort>,
    pub pairing_loop: Arc<AttemptPairingLoop>,
    pub consumer: Arc<ConsumeNotifications>,
    pub heartbeat: Arc<HeartbeatEmitter>,
    pub presentation: PresentationLoop,
    pub sign_out: Arc<SignOut>,
    pub shutdown_grace: Duration,
}

pub struct LifecycleController {
    context: ClientContext,
    token_store: Arc<dyn TokenStorePort>,
    pairing_loop: Arc<AttemptPairingLoop>,
    consumer: Arc<ConsumeNotifications>,
    heartbeat: Arc<HeartbeatEmitter>,
    presentation: PresentationLoop,
    sign_out: Arc<SignOut>,
    shutdown_grace: Duration,
}

impl LifecycleController {
    pub fn from_deps(deps: LifecycleDeps) -> Self {
        let LifecycleDeps {
            context,
            token_store,
            pairing_loop,
            consumer,
            heartbeat,
            presentation,
            sign_out,
            shutdown_grace,
        } = deps;

        Self {
            context,
            token_store,
            pairing_loop,
            consumer,
            heartbeat,
            presentation,
            sign_out,
            shutdown_grace,
        }
    }

    /// Run until `shutdown` resolves or the session hits a local fault.
    pub async fn run<F>(self, shutdown: F) -> Result<(), LocalFault>
    where
        F: Future<Output = ()>,
    {
        let span = info_span!("usecase.lifecycle.run");

        async move {
            let Self {
                context,
                token_store,
                pairing_loop,
                consumer,
                heartbeat,
                presentation,
                sign_out,
                shutdown_grace,
            } = self;

            let mut session = Self::start_session(&context, token_store.as_ref(), pairing_loop, consumer);
            let heartbeat_task = tokio::spawn(async move { heartbeat.run().await });
            let presentation_task = tokio::spawn(presentation.run());

            let outcome = tokio::select! {
                _ = shutdown => {
                    info!("shutdown requested");
                    None
                }
                joined = &mut session => Some(flatten(joined)),
            };

            context.status.set(ConnectionState::ShuttingDown);
            context.cancel.cancel();

            let outcome = match outcome {
                Some(result) => result,
                None => match tokio::time::timeout(shutdown_grace, &mut session).await {
                    Ok(joined) => flatten(joined),
                    Err(_) => {
                        warn!("session did not stop in time");
                        session.abort();
                        Ok(())
                    }
                },
            };

            let drain = async {
                let _ = heartbeat_task.await;
                let _ = presentation_task.await;
            };
            if tokio::time::timeout(shutdown_grace, drain).await.is_err() {
                warn!("background tasks did not stop in time");
            }

            sign_out.execute().await;

            if let Err(fault) = &outcome {
                error!(error = %fault, "stopped on local fault");
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// At most one pairing loop and one consumer ever exist: the consumer is
    /// started by the same task, after a token is available.
    fn start_session(
        context: &ClientContext,
        token_store: &dyn TokenStorePort,
        pairing_loop: Arc<AttemptPairingLoop>,
        consumer: Arc<ConsumeNotifications>,
    ) -> JoinHandle<Result<(), LocalFault>> {
        match token_store.load() {
            Some(token) => {
                info!("using saved token");
                context.token.set(token);
                tokio::spawn(async move { consumer.run().await })
            }
            None => {
                info!("no saved token, pairing");
                tokio::spawn(async move {
                    match pairing_loop.run().await? {
                        Some(_) => consumer.run().await,
                        None => Ok(()),
                    }
                })
            }
        }
    }
}

fn flatten(
    joined: Result<Result<(), LocalFault>, tokio::task::JoinError>,
) -> Result<(), LocalFault> {
    match joined {
        Ok(result) => result,
        Err(e) if e.is_cancelled() => Ok(()),
        Err(e) => Err(LocalFault::StateMachine(format!("session task panicked: {e}"))),
    }
}
