//! # Dependency Injection
//!
//! The only place that depends on `dn-infra`, `dn-platform` and `dn-app` at
//! once. It assembles adapters into use cases and makes no decisions.

use std::sync::Arc;

use anyhow::Context;
use dn_app::usecases::{
    AttemptPairingLoop, ConsumeNotifications, ConsumeNotificationsDeps, HeartbeatEmitter,
    LifecycleController, LifecycleDeps, PairDevice, PairDeviceDeps, PresentationLoop,
    PresentationQueue, ReportStatus, SignOut, DEFAULT_SHUTDOWN_GRACE,
};
use dn_app::ClientContext;
use dn_core::config::ClientConfig;
use dn_core::ports::{HostInfoPort, PresenterPort, StatusDisplayPort, TokenStorePort};
use dn_infra::{
    AmqpNotificationBroker, AmqpStatusPublisher, FileTokenStore, HttpBackend, HttpExternalIp,
};
use dn_platform::{SystemHostInfo, TerminalPresenter, TracingStatusDisplay};

/// Wire the production adapters into a [`LifecycleController`].
pub fn wire_lifecycle(config: &ClientConfig) -> anyhow::Result<LifecycleController> {
    let presenter: Arc<dyn PresenterPort> = Arc::new(TerminalPresenter::stdio());
    let display: Arc<dyn StatusDisplayPort> = Arc::new(TracingStatusDisplay);
    wire_with_ui(config, presenter, display)
}

/// Same as [`wire_lifecycle`] with caller-supplied UI collaborators.
pub fn wire_with_ui(
    config: &ClientConfig,
    presenter: Arc<dyn PresenterPort>,
    display: Arc<dyn StatusDisplayPort>,
) -> anyhow::Result<LifecycleController> {
    let context = ClientContext::new(None, display);

    let token_store: Arc<dyn TokenStorePort> =
        Arc::new(FileTokenStore::new(config.token_file_path.clone()));
    let host: Arc<dyn HostInfoPort> = Arc::new(SystemHostInfo);
    let backend = Arc::new(HttpBackend::new(config).context("build backend HTTP client")?);
    let external_ip =
        Arc::new(HttpExternalIp::new(config).context("build external IP HTTP client")?);

    let pair = Arc::new(PairDevice::from_deps(PairDeviceDeps {
        pairing: backend.clone(),
        host: host.clone(),
        external_ip,
        token_store: token_store.clone(),
        token: context.token.clone(),
        status: context.status.clone(),
    }));
    let pairing_loop = Arc::new(AttemptPairingLoop::new(
        pair.clone(),
        context.cancel.clone(),
        context.status.clone(),
    ));

    let report = Arc::new(ReportStatus::new(Arc::new(AmqpStatusPublisher::new(
        config.broker.clone(),
    ))));
    let (queue, rx) = PresentationQueue::channel();

    let consumer = Arc::new(ConsumeNotifications::from_deps(ConsumeNotificationsDeps {
        broker: Arc::new(AmqpNotificationBroker::new(config.broker.clone())),
        pair,
        report: report.clone(),
        queue,
        context: context.clone(),
    }));
    let presentation = PresentationLoop::new(rx, presenter, report, context.cancel.clone());

    let heartbeat = Arc::new(HeartbeatEmitter::new(
        backend.clone(),
        host.clone(),
        config.heartbeat_interval,
        context.cancel.clone(),
    ));
    let sign_out = Arc::new(SignOut::new(backend, host));

    Ok(LifecycleController::from_deps(LifecycleDeps {
        context,
        token_store,
        pairing_loop,
        consumer,
        heartbeat,
        presentation,
        sign_out,
        shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
    }))
}
