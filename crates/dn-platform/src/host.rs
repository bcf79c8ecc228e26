use dn_core::ports::HostInfoPort;

use crate::net_utils::detect_lan_ipv4;

/// Reads hostname and LAN address from the running machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHostInfo;

impl HostInfoPort for SystemHostInfo {
    fn hostname(&self) -> String {
        gethostname::gethostname().to_string_lossy().into_owned()
    }

    fn lan_ip(&self) -> Option<String> {
        detect_lan_ipv4().map(|ip| ip.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_is_not_empty() {
        assert!(!SystemHostInfo.hostname().is_empty());
    }
}
