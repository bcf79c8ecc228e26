use std::time::Duration;

use async_trait::async_trait;
use dn_core::config::{BrokerConfig, STATUS_PUBLISH_TIMEOUT};
use dn_core::ports::{PublishError, StatusPublisherPort};
use dn_core::StatusUpdate;
use lapin::options::BasicPublishOptions;
use lapin::BasicProperties;
use tokio::time::timeout;
use tracing::debug;

use super::connection::{connect, declare_direct_exchange};

const PERSISTENT: u8 = 2;

/// Publishes each status update on its own short-lived connection, routed to
/// the backend consumer.
pub struct AmqpStatusPublisher {
    config: BrokerConfig,
    timeout: Duration,
}

impl AmqpStatusPublisher {
    pub fn new(config: BrokerConfig) -> Self {
        Self::with_timeout(config, STATUS_PUBLISH_TIMEOUT)
    }

    /// Bounds the connect and the publish separately by `timeout`.
    pub fn with_timeout(config: BrokerConfig, timeout: Duration) -> Self {
        Self { config, timeout }
    }

    fn timed_out(&self, stage: &str) -> PublishError {
        PublishError::Connection(format!("{stage} timed out after {:?}", self.timeout))
    }

    async fn publish_on(
        &self,
        connection: &lapin::Connection,
        payload: &[u8],
    ) -> Result<(), PublishError> {
        let publish_error = |e: lapin::Error| PublishError::Publish(e.to_string());

        let channel = connection.create_channel().await.map_err(publish_error)?;
        declare_direct_exchange(&channel, &self.config.responses_exchange)
            .await
            .map_err(publish_error)?;

        channel
            .basic_publish(
                &self.config.responses_exchange,
                &self.config.backend_consumer_id,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default()
                    .with_content_type("application/json".into())
                    .with_delivery_mode(PERSISTENT),
            )
            .await
            .map_err(publish_error)?
            .await
            .map_err(publish_error)?;

        Ok(())
    }
}

#[async_trait]
impl StatusPublisherPort for AmqpStatusPublisher {
    async fn publish(&self, update: &StatusUpdate) -> Result<(), PublishError> {
        let payload = update.to_json()?;

        let connection = timeout(self.timeout, connect(&self.config))
            .await
            .map_err(|_| self.timed_out("broker connect"))?
            .map_err(|e| PublishError::Connection(e.to_string()))?;

        let result = timeout(self.timeout, self.publish_on(&connection, &payload))
            .await
            .unwrap_or_else(|_| Err(self.timed_out("status publish")));

        match timeout(self.timeout, connection.close(200, "status sent")).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "status connection close failed"),
            Err(_) => debug!("status connection close timed out"),
        }

        if result.is_ok() {
            debug!(
                notification_id = %update.notification_id(),
                status = update.status().as_str(),
                "status published"
            );
        }
        result
    }
}
