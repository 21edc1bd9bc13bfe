//! Resolution of the source address every simulated action originates from.

use flightsim_core::FlightError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use tracing::debug;

/// Public address used only to let the OS choose a route; nothing is sent.
const ROUTE_PROBE: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 53);

/// Resolves the source address for a run.
///
/// With an interface name, returns that interface's address (IPv4 preferred).
/// Without one, returns the local address of the default route.
pub fn resolve_source(interface: Option<&str>) -> Result<IpAddr, FlightError> {
    let ip = match interface {
        Some(name) => interface_address(name)?,
        None => default_route_address()?,
    };
    debug!("Resolved source address {}", ip);
    Ok(ip)
}

fn interface_address(name: &str) -> Result<IpAddr, FlightError> {
    let interfaces = get_if_addrs::get_if_addrs()
        .map_err(|e| FlightError::SourceAddress(format!("cannot list interfaces: {}", e)))?;

    let addrs: Vec<IpAddr> = interfaces
        .iter()
        .filter(|iface| iface.name == name)
        .map(|iface| iface.ip())
        .collect();

    pick_address(&addrs).ok_or_else(|| {
        FlightError::SourceAddress(format!("interface {} not found or has no address", name))
    })
}

/// First non-loopback IPv4, then any IPv4, then the first IPv6.
fn pick_address(addrs: &[IpAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .find(|ip| ip.is_ipv4() && !ip.is_loopback())
        .or_else(|| addrs.iter().find(|ip| ip.is_ipv4()))
        .or_else(|| addrs.iter().find(|ip| ip.is_ipv6()))
        .copied()
}

fn default_route_address() -> Result<IpAddr, FlightError> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .map_err(|e| FlightError::SourceAddress(e.to_string()))?;
    socket
        .connect(ROUTE_PROBE)
        .map_err(|e| FlightError::SourceAddress(format!("no default route: {}", e)))?;
    let ip = socket
        .local_addr()
        .map_err(|e| FlightError::SourceAddress(e.to_string()))?
        .ip();

    if ip.is_unspecified() {
        return Err(FlightError::SourceAddress("no default route".to_string()));
    }
    Ok(ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ips(list: &[&str]) -> Vec<IpAddr> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_prefers_routable_ipv4() {
        let addrs = ips(&["fe80::1", "127.0.0.1", "192.168.1.20"]);
        assert_eq!(pick_address(&addrs), Some("192.168.1.20".parse().unwrap()));
    }

    #[test]
    fn test_falls_back_to_ipv6() {
        let addrs = ips(&["fe80::1", "2001:db8::5"]);
        assert_eq!(pick_address(&addrs), Some("fe80::1".parse().unwrap()));
        assert_eq!(pick_address(&[]), None);
    }

    #[test]
    fn test_loopback_only_interface() {
        let addrs = ips(&["::1", "127.0.0.1"]);
        assert_eq!(pick_address(&addrs), Some("127.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_unknown_interface_is_an_error() {
        let err = resolve_source(Some("flightsim-no-such-if0")).unwrap_err();
        assert!(matches!(err, FlightError::SourceAddress(_)));
    }
}
