//! Backend REST endpoints: pairing, heartbeat and sign-out.
//!
//! All three are form-encoded POSTs bounded by [`HTTP_TIMEOUT`].

use async_trait::async_trait;
use dn_core::config::{ClientConfig, HTTP_TIMEOUT};
use dn_core::ports::{PairError, PairingPort, PresenceError, PresencePort};
use dn_core::{DeviceIdentity, Token};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};

const PAIR_PATH: &str = "/pair/";
const HEARTBEAT_PATH: &str = "/terminal_heartbeat/";
const SIGN_OUT_PATH: &str = "/terminal_sign_out/";

#[derive(Debug, Deserialize)]
struct PairResponse {
    token: Option<String>,
}

pub struct HttpBackend {
    client: reqwest::Client,
    pair_url: String,
    heartbeat_url: String,
    sign_out_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = super::build_client(HTTP_TIMEOUT)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            pair_url: config.endpoint(PAIR_PATH),
            heartbeat_url: config.endpoint(HEARTBEAT_PATH),
            sign_out_url: config.endpoint(SIGN_OUT_PATH),
        }
    }

    async fn post_hostname(&self, url: &str, hostname: &str) -> Result<(), PresenceError> {
        let response = self
            .client
            .post(url)
            .form(&[("hostname", hostname)])
            .send()
            .await
            .map_err(|e| PresenceError::Unreachable(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PresenceError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PairingPort for HttpBackend {
    async fn pair(&self, identity: &DeviceIdentity) -> Result<Token, PairError> {
        let mut form = vec![("hostname", identity.hostname.as_str())];
        if let Some(ip) = identity.external_ip.as_deref() {
            form.push(("external_ip", ip));
        }

        let response = self
            .client
            .post(&self.pair_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| PairError::Unreachable(describe(&e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PairError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: PairResponse = response
            .json()
            .await
            .map_err(|e| PairError::InvalidResponse(e.to_string()))?;

        match body.token.filter(|t| !t.trim().is_empty()) {
            Some(token) => {
                info!(hostname = %identity.hostname, "device paired");
                Ok(Token::new(token))
            }
            None => Err(PairError::InvalidResponse(
                "response has no token".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PresencePort for HttpBackend {
    async fn heartbeat(&self, hostname: &str) -> Result<(), PresenceError> {
        self.post_hostname(&self.heartbeat_url, hostname).await?;
        debug!("heartbeat accepted");
        Ok(())
    }

    async fn sign_out(&self, hostname: &str) -> Result<(), PresenceError> {
        self.post_hostname(&self.sign_out_url, hostname).await?;
        info!("signed out");
        Ok(())
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn backend(base_url: String) -> HttpBackend {
        let mut config = ClientConfig::defaults();
        config.api_base_url = base_url;
        HttpBackend::new(&config).unwrap()
    }

    fn identity() -> DeviceIdentity {
        DeviceIdentity::new("desk-01", Some("203.0.113.7".to_string()))
    }

    #[tokio::test]
    async fn pair_posts_form_and_returns_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/pair/")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("hostname".into(), "desk-01".into()),
                Matcher::UrlEncoded("external_ip".into(), "203.0.113.7".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token": "abc123"}"#)
            .create_async()
            .await;

        let token = backend(server.url()).pair(&identity()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(token, Token::new("abc123"));
    }

    #[tokio::test]
    async fn pair_without_external_ip_sends_hostname_only() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/pair/")
            .match_body("hostname=desk-01")
            .with_status(200)
            .with_body(r#"{"token": "abc123"}"#)
            .create_async()
            .await;

        let identity = DeviceIdentity::new("desk-01", None);
        let token = backend(server.url()).pair(&identity).await.unwrap();

        mock.assert_async().await;
        assert_eq!(token, Token::new("abc123"));
    }

    #[tokio::test]
    async fn pair_non_200_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/pair/")
            .with_status(500)
            .create_async()
            .await;

        let err = backend(server.url()).pair(&identity()).await.unwrap_err();

        assert_eq!(err, PairError::Rejected { status: 500 });
    }

    #[tokio::test]
    async fn pair_without_token_field_is_invalid() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/pair/")
            .with_status(200)
            .with_body(r#"{"detail": "ok"}"#)
            .create_async()
            .await;

        let err = backend(server.url()).pair(&identity()).await.unwrap_err();

        assert!(matches!(err, PairError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn pair_with_non_json_body_is_invalid() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/pair/")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let err = backend(server.url()).pair(&identity()).await.unwrap_err();

        assert!(matches!(err, PairError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_reported_as_such() {
        // Nothing listens on port 9 locally.
        let err = backend("http://127.0.0.1:9".to_string())
            .pair(&identity())
            .await
            .unwrap_err();

        assert!(matches!(err, PairError::Unreachable(_)));
    }

    #[tokio::test]
    async fn heartbeat_and_sign_out_post_hostname() {
        let mut server = Server::new_async().await;
        let heartbeat = server
            .mock("POST", "/terminal_heartbeat/")
            .match_body("hostname=desk-01")
            .with_status(200)
            .create_async()
            .await;
        let sign_out = server
            .mock("POST", "/terminal_sign_out/")
            .match_body("hostname=desk-01")
            .with_status(200)
            .create_async()
            .await;

        let backend = backend(server.url());
        backend.heartbeat("desk-01").await.unwrap();
        backend.sign_out("desk-01").await.unwrap();

        heartbeat.assert_async().await;
        sign_out.assert_async().await;
    }

    #[tokio::test]
    async fn heartbeat_error_status_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/terminal_heartbeat/")
            .with_status(404)
            .create_async()
            .await;

        let err = backend(server.url()).heartbeat("desk-01").await.unwrap_err();

        assert_eq!(err, PresenceError::Rejected { status: 404 });
    }
}
