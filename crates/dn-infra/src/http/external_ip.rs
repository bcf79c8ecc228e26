use std::net::IpAddr;

use async_trait::async_trait;
use dn_core::config::{ClientConfig, HTTP_TIMEOUT};
use dn_core::ports::ExternalIpPort;
use reqwest::Url;
use tracing::{debug, warn};

const LOOPBACK: &str = "127.0.0.1";

/// Looks up the public address through a "what is my IP" endpoint.
///
/// When the backend itself is on loopback the public address is meaningless,
/// so `127.0.0.1` is reported without any lookup.
pub struct HttpExternalIp {
    client: reqwest::Client,
    lookup_url: String,
    backend_is_local: bool,
}

impl HttpExternalIp {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = super::build_client(HTTP_TIMEOUT)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            lookup_url: config.ip_lookup_url.clone(),
            backend_is_local: is_loopback_url(&config.api_base_url),
        }
    }

    async fn lookup(&self) -> anyhow::Result<IpAddr> {
        let text = self
            .client
            .get(&self.lookup_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text.trim().parse()?)
    }
}

#[async_trait]
impl ExternalIpPort for HttpExternalIp {
    async fn resolve(&self) -> Option<String> {
        if self.backend_is_local {
            return Some(LOOPBACK.to_string());
        }

        match self.lookup().await {
            Ok(ip) => {
                debug!(%ip, "external ip resolved");
                Some(ip.to_string())
            }
            Err(e) => {
                warn!(error = %e, "external ip lookup failed");
                None
            }
        }
    }
}

fn is_loopback_url(url: &str) -> bool {
    let Ok(url) = Url::parse(url) else {
        return false;
    };
    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false),
        None => false,
    }
}
