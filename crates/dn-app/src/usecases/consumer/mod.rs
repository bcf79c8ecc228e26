//! Queue consumer runner.
//!
//! Drives [`ConsumerStateMachine`] against the broker port: binds the token
//! queue, forwards notifications to the UI, and recovers from broker failures
//! by reconnecting or re-pairing.

use std::sync::Arc;

use dn_core::consumer::{ConsumerAction, ConsumerEvent, ConsumerState, ConsumerStateMachine};
use dn_core::ports::{InboundMessage, NotificationBrokerPort, NotificationSubscription};
use dn_core::{Notification, StatusUpdate};
use tracing::{debug, info, info_span, warn, Instrument};

use super::pairing::{PairAttemptError, PairDevice};
use super::presentation::PresentationQueue;
use super::ReportStatus;
use crate::context::ClientContext;
use crate::error::LocalFault;
use crate::wait::{wait_or_cancelled, WaitOutcome};

type Subscription = Option<Box<dyn NotificationSubscription>>;

/// Helper for constructing the consumer with explicit dependency fields.
pub struct ConsumeNotificationsDeps {
    pub broker: Arc<dyn NotificationBrokerPort>,
    pub pair: Arc<PairDevice>,
    pub report: Arc<ReportStatus>,
    pub queue: PresentationQueue,
    pub context: ClientContext,
}

/// Use case: consume the token queue until cancelled.
pub struct ConsumeNotifications {
    broker: Arc<dyn NotificationBrokerPort>,
    pair: Arc<PairDevice>,
    report: Arc<ReportStatus>,
    queue: PresentationQueue,
    context: ClientContext,
}

impl ConsumeNotifications {
    pub fn from_deps(deps: ConsumeNotificationsDeps) -> Self {
        let ConsumeNotificationsDeps {
            broker,
            pair,
            report,
            queue,
            context,
        } = deps;

        Self {
            broker,
            pair,
            report,
            queue,
            context,
        }
    }

    /// Runs until the cancellation signal fires (`Ok`) or a local fault makes
    /// progress impossible (`Err`).
    pub async fn run(&self) -> Result<(), LocalFault> {
        let span = info_span!("usecase.consume_notifications.run");

        async {
            let mut subscription: Subscription = None;
            let (mut state, mut actions) = ConsumerStateMachine::start();

            loop {
                let mut event = None;
                for action in actions {
                    event = self.perform(action, &mut subscription).await?;
                    if event.is_some() {
                        break;
                    }
                }

                let Some(event) = event else {
                    if state == ConsumerState::Stopped {
                        break;
                    }
                    self.release(&mut subscription).await;
                    return Err(LocalFault::StateMachine(format!(
                        "consumer stalled in state {state:?}"
                    )));
                };

                let (next, next_actions) = ConsumerStateMachine::transition(state, event);
                debug!(from = ?state, event = ?event, to = ?next, "consumer transition");
                state = next;
                actions = next_actions;
            }

            info!("consumer stopped");
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn perform(
        &self,
        action: ConsumerAction,
        subscription: &mut Subscription,
    ) -> Result<Option<ConsumerEvent>, LocalFault> {
        let cancel = &self.context.cancel;

        let event = match action {
            ConsumerAction::ShowStatus(state) => {
                self.context.status.set(state);
                None
            }
            ConsumerAction::Release => {
                self.release(subscription).await;
                None
            }
            ConsumerAction::Wait(delay) => Some(match wait_or_cancelled(cancel, delay).await {
                WaitOutcome::Elapsed => ConsumerEvent::RetryDue,
                WaitOutcome::Cancelled => ConsumerEvent::Cancelled,
            }),
            ConsumerAction::Subscribe => {
                let token = self.context.token.get().ok_or_else(|| {
                    LocalFault::StateMachine("consumer started without a token".to_string())
                })?;

                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Ok(Some(ConsumerEvent::Cancelled)),
                    result = self.broker.subscribe(&token) => result,
                };

                Some(match result {
                    Ok(sub) => {
                        info!(queue = %token.queue_name(), "listening for notifications");
                        *subscription = Some(sub);
                        ConsumerEvent::Bound
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to bind notifications queue");
                        ConsumerEvent::BrokerFailed(e.failure_kind())
                    }
                })
            }
            ConsumerAction::Consume => Some(self.consume(subscription).await),
            ConsumerAction::RePair => {
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Ok(Some(ConsumerEvent::Cancelled)),
                    result = self.pair.execute() => result,
                };

                Some(match result {
                    Ok(_) => ConsumerEvent::RePaired,
                    Err(PairAttemptError::Pair(e)) => {
                        warn!(error = %e, "re-pairing failed");
                        ConsumerEvent::RePairFailed
                    }
                    Err(PairAttemptError::LocalFault(fault)) => {
                        self.release(subscription).await;
                        return Err(fault);
                    }
                })
            }
        };

        Ok(event)
    }

    async fn consume(&self, subscription: &mut Subscription) -> ConsumerEvent {
        let Some(sub) = subscription.as_mut() else {
            return ConsumerEvent::BrokerFailed(dn_core::consumer::FailureKind::Unexpected);
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = self.context.cancel.cancelled() => return ConsumerEvent::Cancelled,
                next = sub.next_message() => next,
            };

            match next {
                Ok(message) => {
                    if let Some(event) = self.handle_message(sub.as_mut(), message).await {
                        return event;
                    }
                }
                Err(e) if e.is_auth_stale() => {
                    warn!(error = %e, "broker rejected the token queue");
                    return ConsumerEvent::BrokerFailed(e.failure_kind());
                }
                Err(e) => {
                    warn!(error = %e, "notification stream failed");
                    return ConsumerEvent::BrokerFailed(e.failure_kind());
                }
            }
        }
    }

    /// Report delivery, hand the notification to the UI, then acknowledge.
    /// Does not wait for the user.
    ///
    /// Returns [`ConsumerEvent::Cancelled`] if shutdown interrupts the
    /// delivery report; the message is then left unacknowledged.
    async fn handle_message(
        &self,
        sub: &mut dyn NotificationSubscription,
        message: InboundMessage,
    ) -> Option<ConsumerEvent> {
        match Notification::decode(&message.body) {
            Ok(notification) => {
                debug!(notification_id = %notification.id, "notification received");
                tokio::select! {
                    biased;
                    _ = self.context.cancel.cancelled() => {
                        debug!(notification_id = %notification.id, "cancelled while reporting delivery");
                        return Some(ConsumerEvent::Cancelled);
                    }
                    _ = self.report.execute(StatusUpdate::delivered(notification.id)) => {}
                }
                if !self.queue.enqueue(notification) {
                    warn!("presentation loop gone, notification not shown");
                }
            }
            Err(e) => {
                warn!(error = %e, delivery_tag = message.delivery_tag, "discarding malformed notification");
            }
        }

        if let Err(e) = sub.ack(message.delivery_tag).await {
            warn!(error = %e, delivery_tag = message.delivery_tag, "failed to acknowledge delivery");
        }
        None
    }

    async fn release(&self, subscription: &mut Subscription) {
        if let Some(mut sub) = subscription.take() {
            sub.close().await;
            debug!("broker subscription released");
        }
    }
}
