use std::sync::Arc;

use dn_core::ports::{ExternalIpPort, HostInfoPort, PairError, PairingPort, TokenStorePort};
use dn_core::{ConnectionState, DeviceIdentity, Token};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, info_span, warn, Instrument};

use crate::context::{LifecycleStatus, TokenCell};
use crate::error::LocalFault;

#[derive(Debug, Error)]
pub enum PairAttemptError {
    /// Network or backend failure; worth retrying.
    #[error(transparent)]
    Pair(#[from] PairError),

    #[error(transparent)]
    LocalFault(#[from] LocalFault),
}

/// Helper for constructing [`PairDevice`] with explicit dependency fields.
pub struct PairDeviceDeps {
    pub pairing: Arc<dyn PairingPort>,
    pub host: Arc<dyn HostInfoPort>,
    pub external_ip: Arc<dyn ExternalIpPort>,
    pub token_store: Arc<dyn TokenStorePort>,
    pub token: TokenCell,
    pub status: LifecycleStatus,
}

/// Use case: exchange this device's identity for a token, persist it and make
/// it the current token.
///
/// Calls are serialized; two pairings never run at the same time.
pub struct PairDevice {
    pairing: Arc<dyn PairingPort>,
    host: Arc<dyn HostInfoPort>,
    external_ip: Arc<dyn ExternalIpPort>,
    token_store: Arc<dyn TokenStorePort>,
    token: TokenCell,
    status: LifecycleStatus,
    in_flight: Mutex<()>,
}

impl PairDevice {
    pub fn from_deps(deps: PairDeviceDeps) -> Self {
        let PairDeviceDeps {
            pairing,
            host,
            external_ip,
            token_store,
            token,
            status,
        } = deps;

        Self {
            pairing,
            host,
            external_ip,
            token_store,
            token,
            status,
            in_flight: Mutex::new(()),
        }
    }

    /// Identity sent with the pairing request. Falls back to the LAN address
    /// when the external address cannot be resolved.
    pub async fn identity(&self) -> DeviceIdentity {
        let external_ip = match self.external_ip.resolve().await {
            Some(ip) => Some(ip),
            None => {
                let lan_ip = self.host.lan_ip();
                warn!(fallback = ?lan_ip, "external IP unavailable, using LAN address");
                lan_ip
            }
        };
        DeviceIdentity::new(self.host.hostname(), external_ip)
    }

    pub async fn execute(&self) -> Result<Token, PairAttemptError> {
        let span = info_span!("usecase.pair_device.execute");

        async {
            let _serialized = self.in_flight.lock().await;
            self.status.set(ConnectionState::Pairing);

            let identity = self.identity().await;
            info!(hostname = %identity.hostname, external_ip = ?identity.external_ip, "requesting pairing");

            let token = self.pairing.pair(&identity).await?;

            self.token_store
                .save(&token)
                .map_err(|e| LocalFault::TokenNotPersisted(e.to_string()))?;
            self.token.set(token.clone());

            info!("paired with backend");
            Ok(token)
        }
        .instrument(span)
        .await
    }
}
