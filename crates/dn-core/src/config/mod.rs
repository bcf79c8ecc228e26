//! Client configuration DTOs.
//!
//! Pure data. Reading the environment and validating values happens in the
//! binary's bootstrap; this module only describes the shape and the defaults.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_BROKER_HOST: &str = "localhost";
pub const DEFAULT_BROKER_PORT: u16 = 5672;
pub const DEFAULT_BROKER_USERNAME: &str = "guest";
pub const DEFAULT_BROKER_PASSWORD: &str = "guest";
pub const DEFAULT_TOKEN_FILE_PATH: &str = "app/terminal_token.json";
pub const DEFAULT_HEARTBEAT_MINS: u64 = 3;
pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org";
pub const DEFAULT_BACKEND_CONSUMER_ID: &str = "django_server";

pub const NOTIFICATIONS_EXCHANGE: &str = "notifications";
pub const RESPONSES_EXCHANGE: &str = "notifications_responses";

/// Timeout applied to every backend HTTP call.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Bound on connecting to the broker and on publishing one status update.
pub const STATUS_PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub notifications_exchange: String,
    pub responses_exchange: String,
    /// Routing key of the backend service that consumes status updates.
    pub backend_consumer_id: String,
}

/// Application configuration DTO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub broker: BrokerConfig,
    pub token_file_path: PathBuf,
    pub heartbeat_interval: Duration,
    pub ip_lookup_url: String,
}

impl BrokerConfig {
    pub fn defaults() -> Self {
        Self {
            host: DEFAULT_BROKER_HOST.to_string(),
            port: DEFAULT_BROKER_PORT,
            username: DEFAULT_BROKER_USERNAME.to_string(),
            password: DEFAULT_BROKER_PASSWORD.to_string(),
            notifications_exchange: NOTIFICATIONS_EXCHANGE.to_string(),
            responses_exchange: RESPONSES_EXCHANGE.to_string(),
            backend_consumer_id: DEFAULT_BACKEND_CONSUMER_ID.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn defaults() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            broker: BrokerConfig::defaults(),
            token_file_path: PathBuf::from(DEFAULT_TOKEN_FILE_PATH),
            heartbeat_interval: Duration::from_secs(DEFAULT_HEARTBEAT_MINS * 60),
            ip_lookup_url: DEFAULT_IP_LOOKUP_URL.to_string(),
        }
    }

    /// Backend URL for `path`, tolerant of a trailing slash on the base.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClientConfig::defaults();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.broker.port, 5672);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(180));
        assert_eq!(config.token_file_path, PathBuf::from("app/terminal_token.json"));
        assert_eq!(config.broker.backend_consumer_id, "django_server");
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let mut config = ClientConfig::defaults();
        assert_eq!(config.endpoint("/pair/"), "http://localhost:8000/pair/");
        config.api_base_url = "http://backend:8000/".to_string();
        assert_eq!(config.endpoint("pair/"), "http://backend:8000/pair/");
    }
}
