use dn_core::config::BrokerConfig;
use dn_core::ports::BrokerError;
use lapin::options::ExchangeDeclareOptions;
use lapin::protocol::AMQPErrorKind;
use lapin::types::FieldTable;
use lapin::uri::{AMQPAuthority, AMQPUri, AMQPUserInfo};
use lapin::{Channel, Connection, ConnectionProperties, ExchangeKind};

pub(crate) fn broker_uri(config: &BrokerConfig) -> AMQPUri {
    AMQPUri {
        authority: AMQPAuthority {
            userinfo: AMQPUserInfo {
                username: config.username.clone(),
                password: config.password.clone(),
            },
            host: config.host.clone(),
            port: config.port,
        },
        ..Default::default()
    }
}

pub(crate) async fn connect(config: &BrokerConfig) -> lapin::Result<Connection> {
    Connection::connect_uri(broker_uri(config), ConnectionProperties::default()).await
}

/// Both exchanges are durable direct exchanges owned by the backend; declaring
/// them again with the same shape is a no-op.
pub(crate) async fn declare_direct_exchange(channel: &Channel, name: &str) -> lapin::Result<()> {
    channel
        .exchange_declare(
            name,
            ExchangeKind::Direct,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
}

/// A soft protocol error means the broker closed our channel (queue or
/// binding refused), which happens when the token is no longer valid.
/// Everything network-shaped is a plain connection problem.
pub(crate) fn classify(error: lapin::Error) -> BrokerError {
    match &error {
        lapin::Error::ProtocolError(amqp) => match amqp.kind() {
            AMQPErrorKind::Soft(_) => BrokerError::ChannelClosed(amqp.to_string()),
            AMQPErrorKind::Hard(_) => BrokerError::Connection(amqp.to_string()),
        },
        lapin::Error::IOError(_)
        | lapin::Error::InvalidConnectionState(_)
        | lapin::Error::InvalidChannelState(_)
        | lapin::Error::MissingHeartbeatError => BrokerError::Connection(error.to_string()),
        _ => BrokerError::Other(error.to_string()),
    }
}
