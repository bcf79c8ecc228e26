use async_trait::async_trait;

/// Facts about the local machine.
pub trait HostInfoPort: Send + Sync {
    fn hostname(&self) -> String;

    /// Private LAN IPv4 address, if the host has one.
    fn lan_ip(&self) -> Option<String>;
}

/// Resolves the address the backend sees this device connect from.
#[async_trait]
pub trait ExternalIpPort: Send + Sync {
    async fn resolve(&self) -> Option<String>;
}
