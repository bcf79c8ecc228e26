use async_trait::async_trait;
use dn_core::config::BrokerConfig;
use dn_core::ports::{BrokerError, InboundMessage, NotificationBrokerPort, NotificationSubscription};
use dn_core::Token;
use futures::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicQosOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, Consumer};
use tracing::{debug, info};

use super::connection::{classify, connect, declare_direct_exchange};

const CONSUMER_TAG: &str = "desk-notifier";

/// Opens a fresh connection per subscription and binds `queue_{token}` to the
/// notifications exchange.
pub struct AmqpNotificationBroker {
    config: BrokerConfig,
}

impl AmqpNotificationBroker {
    pub fn new(config: BrokerConfig) -> Self {
        Self { config }
    }

    async fn bind(&self, connection: &Connection, token: &Token) -> lapin::Result<(Channel, Consumer)> {
        let channel = connection.create_channel().await?;
        declare_direct_exchange(&channel, &self.config.notifications_exchange).await?;

        let queue = token.queue_name();
        channel
            .queue_declare(
                &queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        channel
            .queue_bind(
                &queue,
                &self.config.notifications_exchange,
                token.routing_key(),
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;

        // One unacknowledged notification at a time keeps broker order.
        channel.basic_qos(1, BasicQosOptions::default()).await?;
        let consumer = channel
            .basic_consume(
                &queue,
                CONSUMER_TAG,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        Ok((channel, consumer))
    }
}

#[async_trait]
impl NotificationBrokerPort for AmqpNotificationBroker {
    async fn subscribe(&self, token: &Token) -> Result<Box<dyn NotificationSubscription>, BrokerError> {
        let connection = connect(&self.config).await.map_err(classify)?;
        debug!(host = %self.config.host, port = self.config.port, "broker connected");

        match self.bind(&connection, token).await {
            Ok((channel, consumer)) => {
                info!(queue = %token.queue_name(), "queue bound");
                Ok(Box::new(AmqpSubscription {
                    connection: Some(connection),
                    channel,
                    consumer,
                }))
            }
            Err(e) => {
                let error = classify(e);
                let _ = connection.close(200, "bind failed").await;
                Err(error)
            }
        }
    }
}

pub struct AmqpSubscription {
    connection: Option<Connection>,
    channel: Channel,
    consumer: Consumer,
}

#[async_trait]
impl NotificationSubscription for AmqpSubscription {
    async fn next_message(&mut self) -> Result<InboundMessage, BrokerError> {
        match self.consumer.next().await {
            Some(Ok(delivery)) => Ok(InboundMessage::new(delivery.delivery_tag, delivery.data)),
            Some(Err(e)) => Err(classify(e)),
            None => Err(BrokerError::Connection(
                "consumer stream ended".to_string(),
            )),
        }
    }

    async fn ack(&mut self, delivery_tag: u64) -> Result<(), BrokerError> {
        self.channel
            .basic_ack(delivery_tag, BasicAckOptions::default())
            .await
            .map_err(classify)
    }

    async fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            if connection.status().connected() {
                if let Err(e) = connection.close(200, "client closing").await {
                    debug!(error = %e, "broker connection close failed");
                }
            }
        }
    }
}
