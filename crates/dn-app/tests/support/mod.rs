//! Shared fakes for the use-case integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use dn_app::usecases::{
    AttemptPairingLoop, ConsumeNotifications, ConsumeNotificationsDeps, HeartbeatEmitter,
    LifecycleController, LifecycleDeps, PairDevice, PairDeviceDeps, PresentationLoop,
    PresentationQueue, ReportStatus, SignOut,
};
use dn_app::ClientContext;
use dn_core::ports::{
    BrokerError, ExternalIpPort, HostInfoPort, InboundMessage, NotificationBrokerPort,
    NotificationSubscription, PairError, PairingPort, PresenceError, PresencePort,
    PresentationOutcome, PresenterError, PresenterPort, PublishError, StatusDisplayPort,
    StatusPublisherPort, TokenStoreError, TokenStorePort,
};
use dn_core::{ConnectionState, DeviceIdentity, Notification, StatusUpdate, Token};

static TRACE_INIT: Once = Once::new();

pub fn init_tracing() {
    TRACE_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Ordered record of everything observable the fakes did.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| *e == entry).count()
    }
}

pub fn body(id: i64, sender: &str, content: &str) -> Vec<u8> {
    format!(
        r#"{{"notification_id": {id}, "sender_user": "{sender}", "notification_content": "{content}"}}"#
    )
    .into_bytes()
}

// === Broker ===

pub enum SubscribeScript {
    Fail(BrokerError),
    /// Deliver these items in order, then block forever.
    Deliver(Vec<Result<InboundMessage, BrokerError>>),
}

pub struct FakeBroker {
    scripts: Mutex<VecDeque<SubscribeScript>>,
    pub subscribed: Mutex<Vec<Token>>,
    pub closes: Arc<AtomicUsize>,
    log: EventLog,
}

impl FakeBroker {
    pub fn new(log: EventLog, scripts: Vec<SubscribeScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            subscribed: Mutex::new(Vec::new()),
            closes: Arc::new(AtomicUsize::new(0)),
            log,
        }
    }

    pub fn subscribed_tokens(&self) -> Vec<String> {
        self.subscribed
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }
}

#[async_trait]
impl NotificationBrokerPort for FakeBroker {
    async fn subscribe(
        &self,
        token: &Token,
    ) -> Result<Box<dyn NotificationSubscription>, BrokerError> {
        self.subscribed.lock().unwrap().push(token.clone());
        self.log.push(format!("subscribe:{}", token.queue_name()));
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SubscribeScript::Deliver(Vec::new()));
        match script {
            SubscribeScript::Fail(e) => Err(e),
            SubscribeScript::Deliver(items) => Ok(Box::new(FakeSubscription {
                items: items.into(),
                closes: self.closes.clone(),
                log: self.log.clone(),
                closed: false,
            })),
        }
    }
}

struct FakeSubscription {
    items: VecDeque<Result<InboundMessage, BrokerError>>,
    closes: Arc<AtomicUsize>,
    log: EventLog,
    closed: bool,
}

#[async_trait]
impl NotificationSubscription for FakeSubscription {
    async fn next_message(&mut self) -> Result<InboundMessage, BrokerError> {
        match self.items.pop_front() {
            Some(item) => item,
            None => std::future::pending().await,
        }
    }

    async fn ack(&mut self, delivery_tag: u64) -> Result<(), BrokerError> {
        self.log.push(format!("ack:{delivery_tag}"));
        Ok(())
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.log.push("close");
        }
    }
}

// === Pairing ===

pub struct FakePairing {
    results: Mutex<VecDeque<Result<Token, PairError>>>,
    pub calls: Mutex<Vec<tokio::time::Instant>>,
    log: EventLog,
}

impl FakePairing {
    /// Scripted results; once exhausted every call fails as unreachable.
    pub fn new(log: EventLog, results: Vec<Result<Token, PairError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
            log,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PairingPort for FakePairing {
    async fn pair(&self, identity: &DeviceIdentity) -> Result<Token, PairError> {
        self.calls.lock().unwrap().push(tokio::time::Instant::now());
        self.log.push(format!("pair:{}", identity.hostname));
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PairError::Unreachable("connection refused".to_string())))
    }
}

// === Token store ===

#[derive(Default)]
pub struct MemoryTokenStore {
    pub token: Mutex<Option<Token>>,
    pub fail_writes: bool,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(Token::new(token))),
            fail_writes: false,
        }
    }

    pub fn current(&self) -> Option<Token> {
        self.token.lock().unwrap().clone()
    }
}

impl TokenStorePort for MemoryTokenStore {
    fn load(&self) -> Option<Token> {
        self.current()
    }

    fn save(&self, token: &Token) -> Result<(), TokenStoreError> {
        if self.fail_writes {
            return Err(TokenStoreError::Write("permission denied".to_string()));
        }
        *self.token.lock().unwrap() = Some(token.clone());
        Ok(())
    }
}

// === Status, presenter, presence, host ===

pub struct RecordingPublisher {
    log: EventLog,
    /// Record the update, then never complete, like a broker that stopped
    /// answering.
    stall: bool,
}

#[async_trait]
impl StatusPublisherPort for RecordingPublisher {
    async fn publish(&self, update: &StatusUpdate) -> Result<(), PublishError> {
        let mut entry = format!(
            "status:{}:{}",
            update.status().as_str(),
            update.notification_id()
        );
        if let Some(reply) = update.reply_text() {
            entry.push(':');
            entry.push_str(reply);
        }
        if self.stall {
            self.log.push(format!("stalled:{entry}"));
            return std::future::pending().await;
        }
        self.log.push(entry);
        Ok(())
    }
}

pub struct ScriptedPresenter {
    replies: Mutex<VecDeque<Option<String>>>,
    log: EventLog,
}

#[async_trait]
impl PresenterPort for ScriptedPresenter {
    async fn present(
        &self,
        notification: &Notification,
    ) -> Result<PresentationOutcome, PresenterError> {
        self.log.push(format!("present:{}", notification.id));
        let reply = self.replies.lock().unwrap().pop_front().flatten();
        Ok(PresentationOutcome { reply })
    }
}

#[derive(Default)]
pub struct CountingPresence {
    pub heartbeats: AtomicUsize,
    pub sign_outs: AtomicUsize,
}

#[async_trait]
impl PresencePort for CountingPresence {
    async fn heartbeat(&self, _hostname: &str) -> Result<(), PresenceError> {
        self.heartbeats.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn sign_out(&self, _hostname: &str) -> Result<(), PresenceError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FixedHost;

impl HostInfoPort for FixedHost {
    fn hostname(&self) -> String {
        "desk-01".to_string()
    }

    fn lan_ip(&self) -> Option<String> {
        Some("192.168.1.20".to_string())
    }
}

pub struct LoopbackIp;

#[async_trait]
impl ExternalIpPort for LoopbackIp {
    async fn resolve(&self) -> Option<String> {
        Some("127.0.0.1".to_string())
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub shown: Mutex<Vec<ConnectionState>>,
}

impl StatusDisplayPort for RecordingDisplay {
    fn show(&self, state: &ConnectionState) {
        self.shown.lock().unwrap().push(state.clone());
    }
}

// === Harness ===

pub struct Harness {
    pub log: EventLog,
    pub context: ClientContext,
    pub broker: Arc<FakeBroker>,
    pub pairing: Arc<FakePairing>,
    pub store: Arc<MemoryTokenStore>,
    pub presence: Arc<CountingPresence>,
    pub display: Arc<RecordingDisplay>,
    pub pair: Arc<PairDevice>,
    pub pairing_loop: Arc<AttemptPairingLoop>,
    pub consumer: Arc<ConsumeNotifications>,
    pub presentation: Option<PresentationLoop>,
    pub heartbeat: Arc<HeartbeatEmitter>,
    pub sign_out: Arc<SignOut>,
}

pub struct HarnessBuilder {
    initial_token: Option<Token>,
    store: MemoryTokenStore,
    broker_scripts: Vec<SubscribeScript>,
    pair_results: Vec<Result<Token, PairError>>,
    replies: Vec<Option<String>>,
    stall_status: bool,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            initial_token: None,
            store: MemoryTokenStore::default(),
            broker_scripts: Vec::new(),
            pair_results: Vec::new(),
            replies: Vec::new(),
            stall_status: false,
        }
    }

    /// Token already current in the context (consumer-only tests).
    pub fn current_token(mut self, token: &str) -> Self {
        self.initial_token = Some(Token::new(token));
        self
    }

    pub fn store(mut self, store: MemoryTokenStore) -> Self {
        self.store = store;
        self
    }

    pub fn broker(mut self, scripts: Vec<SubscribeScript>) -> Self {
        self.broker_scripts = scripts;
        self
    }

    pub fn pairing(mut self, results: Vec<Result<Token, PairError>>) -> Self {
        self.pair_results = results;
        self
    }

    pub fn replies(mut self, replies: Vec<Option<String>>) -> Self {
        self.replies = replies;
        self
    }

    /// Status publishes hang forever.
    pub fn stall_status(mut self) -> Self {
        self.stall_status = true;
        self
    }

    pub fn build(self) -> Harness {
        init_tracing();
        let log = EventLog::default();
        let display = Arc::new(RecordingDisplay::default());
        let context = ClientContext::new(self.initial_token, display.clone());

        let broker = Arc::new(FakeBroker::new(log.clone(), self.broker_scripts));
        let pairing = Arc::new(FakePairing::new(log.clone(), self.pair_results));
        let store = Arc::new(self.store);
        let presence = Arc::new(CountingPresence::default());

        let pair = Arc::new(PairDevice::from_deps(PairDeviceDeps {
            pairing: pairing.clone(),
            host: Arc::new(FixedHost),
            external_ip: Arc::new(LoopbackIp),
            token_store: store.clone(),
            token: context.token.clone(),
            status: context.status.clone(),
        }));
        let pairing_loop = Arc::new(AttemptPairingLoop::new(
            pair.clone(),
            context.cancel.clone(),
            context.status.clone(),
        ));

        let report = Arc::new(ReportStatus::new(Arc::new(RecordingPublisher {
            log: log.clone(),
            stall: self.stall_status,
        })));
        let (queue, rx) = PresentationQueue::channel();
        let consumer = Arc::new(ConsumeNotifications::from_deps(ConsumeNotificationsDeps {
            broker: broker.clone(),
            pair: pair.clone(),
            report: report.clone(),
            queue,
            context: context.clone(),
        }));
        let presenter = Arc::new(ScriptedPresenter {
            replies: Mutex::new(self.replies.into()),
            log: log.clone(),
        });
        let presentation = PresentationLoop::new(rx, presenter, report, context.cancel.clone());

        let heartbeat = Arc::new(HeartbeatEmitter::new(
            presence.clone(),
            Arc::new(FixedHost),
            Duration::from_secs(180),
            context.cancel.clone(),
        ));
        let sign_out = Arc::new(SignOut::new(presence.clone(), Arc::new(FixedHost)));

        Harness {
            log,
            context,
            broker,
            pairing,
            store,
            presence,
            display,
            pair,
            pairing_loop,
            consumer,
            presentation: Some(presentation),
            heartbeat,
            sign_out,
        }
    }
}

impl Harness {
    pub fn lifecycle(&mut self, shutdown_grace: Duration) -> LifecycleController {
        LifecycleController::from_deps(LifecycleDeps {
            context: self.context.clone(),
            token_store: self.store.clone(),
            pairing_loop: self.pairing_loop.clone(),
            consumer: self.consumer.clone(),
            heartbeat: self.heartbeat.clone(),
            presentation: self.presentation.take().expect("presentation loop already taken"),
            sign_out: self.sign_out.clone(),
            shutdown_grace,
        })
    }
}

/// Poll `condition` every 10ms (virtual or real time) until it holds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}
