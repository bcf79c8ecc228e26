use local_ip_address::list_afinet_netifas;
use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, warn};

/// Pick the private IPv4 address the backend is most likely to see for this
/// machine when the public address cannot be resolved.
///
/// Skips loopback, link-local, tunnel/VPN interfaces and the 198.18.0.0/15
/// benchmarking range used by TUN proxies.
pub fn detect_lan_ipv4() -> Option<Ipv4Addr> {
    let interfaces = match list_afinet_netifas() {
        Ok(ifaces) => ifaces,
        Err(e) => {
            warn!(error = %e, "failed to enumerate network interfaces");
            return None;
        }
    };

    let found = pick_lan_ipv4(interfaces.iter().map(|(name, ip)| (name.as_str(), *ip)));
    match found {
        Some(ip) => debug!(%ip, "detected LAN address"),
        None => debug!("no LAN address found"),
    }
    found
}

fn pick_lan_ipv4<'a>(interfaces: impl IntoIterator<Item = (&'a str, IpAddr)>) -> Option<Ipv4Addr> {
    interfaces.into_iter().find_map(|(name, ip)| match ip {
        IpAddr::V4(v4)
            if !v4.is_loopback()
                && !v4.is_link_local()
                && !is_tunnel_interface(name)
                && !is_proxy_range(v4)
                && v4.is_private() =>
        {
            Some(v4)
        }
        _ => None,
    })
}

fn is_tunnel_interface(name: &str) -> bool {
    ["utun", "tun", "tap", "wg"]
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

fn is_proxy_range(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    octets[0] == 198 && (octets[1] == 18 || octets[1] == 19)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(a, b, c, d))
    }

    #[test]
    fn first_private_physical_address_wins() {
        let interfaces = vec![
            ("lo", v4(127, 0, 0, 1)),
            ("utun3", v4(10, 8, 0, 2)),
            ("eth0", v4(192, 168, 1, 20)),
            ("wlan0", v4(10, 0, 0, 5)),
        ];
        assert_eq!(pick_lan_ipv4(interfaces), Some(Ipv4Addr::new(192, 168, 1, 20)));
    }

    #[test]
    fn public_link_local_and_proxy_addresses_are_skipped() {
        let interfaces = vec![
            ("eth0", v4(8, 8, 8, 8)),
            ("eth1", v4(169, 254, 3, 4)),
            ("en0", v4(198, 18, 0, 1)),
            ("en1", IpAddr::V6(std::net::Ipv6Addr::LOCALHOST)),
        ];
        assert_eq!(pick_lan_ipv4(interfaces), None);
    }

    #[test]
    fn tunnel_interfaces_detected() {
        assert!(is_tunnel_interface("utun0"));
        assert!(is_tunnel_interface("tun0"));
        assert!(is_tunnel_interface("tap0"));
        assert!(is_tunnel_interface("wg0"));
        assert!(!is_tunnel_interface("en0"));
        assert!(!is_tunnel_interface("eth0"));
    }

    #[test]
    fn detection_does_not_panic_without_network() {
        let _ = detect_lan_ipv4();
    }
}
