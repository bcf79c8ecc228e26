//! # Configuration Loader
//!
//! Builds the [`ClientConfig`] DTO from the environment. A `.env` file in the
//! working directory is applied first when present; real environment variables
//! win over it.
//!
//! Unset variables take the documented defaults. Values that are set but
//! unusable are reported as [`ConfigError`] before any network activity.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use dn_core::config::ClientConfig;
use thiserror::Error;

pub const API_BASE_URL: &str = "API_BASE_URL";
pub const RABBITMQ_HOST: &str = "RABBITMQ_HOST";
pub const RABBITMQ_PORT: &str = "RABBITMQ_PORT";
pub const RABBITMQ_USERNAME: &str = "RABBITMQ_USERNAME";
pub const RABBITMQ_PASSWORD: &str = "RABBITMQ_PASSWORD";
pub const TOKEN_FILE_PATH: &str = "TOKEN_FILE_PATH";
pub const HEARTBEAT_MINS: &str = "HEARTBEAT_MINS";
pub const IP_LOOKUP_URL: &str = "IP_LOOKUP_URL";
pub const BACKEND_CONSUMER_ID: &str = "BACKEND_CONSUMER_ID";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    NotANumber { var: &'static str, value: String },

    #[error("HEARTBEAT_MINS must be at least 1")]
    ZeroHeartbeat,

    #[error("{var} must be an absolute http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Load configuration from `.env` (if present) and the process environment.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "ignoring unreadable .env file");
        }
    }
    load_config_from(|var| std::env::var(var).ok())
}

/// Same as [`load_config`] over an explicit variable source.
pub fn load_config_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::defaults();
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(API_BASE_URL) {
        config.api_base_url = parse_http_url(API_BASE_URL, url)?;
    }
    if let Some(url) = get(IP_LOOKUP_URL) {
        config.ip_lookup_url = parse_http_url(IP_LOOKUP_URL, url)?;
    }

    if let Some(host) = get(RABBITMQ_HOST) {
        config.broker.host = host;
    }
    if let Some(port) = get(RABBITMQ_PORT) {
        config.broker.port = parse_number(RABBITMQ_PORT, port)?;
    }
    if let Some(username) = get(RABBITMQ_USERNAME) {
        config.broker.username = username;
    }
    if let Some(password) = get(RABBITMQ_PASSWORD) {
        config.broker.password = password;
    }
    if let Some(consumer_id) = get(BACKEND_CONSUMER_ID) {
        config.broker.backend_consumer_id = consumer_id;
    }

    if let Some(path) = get(TOKEN_FILE_PATH) {
        config.token_file_path = PathBuf::from(path);
    }
    if let Some(mins) = get(HEARTBEAT_MINS) {
        let mins: u64 = parse_number(HEARTBEAT_MINS, mins)?;
        if mins == 0 {
            return Err(ConfigError::ZeroHeartbeat);
        }
        config.heartbeat_interval = Duration::from_secs(mins * 60);
    }

    Ok(config)
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber { var, value })
}

fn parse_http_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match rest {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidUrl { var, value }),
    }
}
