//! Single-question DNS queries sent from a chosen source address.
//!
//! Only the header of a reply is decoded: the simulators care that a lookup
//! left the host, not what it resolved to.

use crate::config::DnsSettings;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::net::UdpSocket;

const RESOLV_CONF: &str = "/etc/resolv.conf";
const FALLBACK_NAMESERVER: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 53);
const HEADER_LEN: usize = 12;
const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Error, Debug)]
pub enum DnsError {
    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("malformed reply")]
    Malformed,
}

/// Question types the simulators ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A,
    Txt,
}

impl RecordType {
    fn code(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Txt => 16,
        }
    }
}

/// Decoded reply header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyHeader {
    pub id: u16,
    pub rcode: u8,
    pub answers: u16,
}

impl ReplyHeader {
    pub fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_LEN {
            return None;
        }
        // QR bit must be set on a response.
        if buf[2] & 0x80 == 0 {
            return None;
        }
        Some(Self {
            id: u16::from_be_bytes([buf[0], buf[1]]),
            rcode: buf[3] & 0x0f,
            answers: u16::from_be_bytes([buf[6], buf[7]]),
        })
    }

    pub fn rcode_name(&self) -> &'static str {
        match self.rcode {
            0 => "NOERROR",
            1 => "FORMERR",
            2 => "SERVFAIL",
            3 => "NXDOMAIN",
            4 => "NOTIMP",
            5 => "REFUSED",
            _ => "UNKNOWN",
        }
    }
}

/// Encodes a recursive query for `name`.
pub fn build_query(id: u16, name: &str, qtype: RecordType) -> Result<Vec<u8>, DnsError> {
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(DnsError::InvalidName(name.to_string()));
    }

    let mut packet = Vec::with_capacity(HEADER_LEN + name.len() + 6);
    packet.extend_from_slice(&id.to_be_bytes());
    packet.extend_from_slice(&[0x01, 0x00]); // RD
    packet.extend_from_slice(&[0x00, 0x01]); // QDCOUNT
    packet.extend_from_slice(&[0x00; 6]); // ANCOUNT, NSCOUNT, ARCOUNT

    for label in name.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(DnsError::InvalidName(name.to_string()));
        }
        packet.push(label.len() as u8);
        packet.extend_from_slice(label.as_bytes());
    }
    packet.push(0);

    packet.extend_from_slice(&qtype.code().to_be_bytes());
    packet.extend_from_slice(&[0x00, 0x01]); // IN
    Ok(packet)
}

/// `nameserver` entries of a resolv.conf file, in file order.
///
/// Scoped addresses (`fe80::1%eth0`) are skipped: a socket bound to a
/// plain source address cannot reach them.
pub fn parse_resolv_conf(content: &str) -> Vec<SocketAddr> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| line.strip_prefix("nameserver"))
        .map(str::trim)
        .filter(|addr| !addr.contains('%'))
        .filter_map(|addr| addr.parse::<IpAddr>().ok())
        .map(|ip| SocketAddr::new(ip, 53))
        .collect()
}

/// The system resolvers, or a public one when none is configured.
pub fn system_nameservers() -> Vec<SocketAddr> {
    let nameservers = std::fs::read_to_string(Path::new(RESOLV_CONF))
        .map(|content| parse_resolv_conf(&content))
        .unwrap_or_default();
    if nameservers.is_empty() {
        vec![FALLBACK_NAMESERVER]
    } else {
        nameservers
    }
}

/// Sends queries to the first known nameserver reachable from the source.
#[derive(Debug, Clone)]
pub struct Resolver {
    nameservers: Vec<SocketAddr>,
    timeout: Duration,
}

impl Resolver {
    pub fn new(nameserver: SocketAddr, timeout: Duration) -> Self {
        Self::with_nameservers(vec![nameserver], timeout)
    }

    pub fn with_nameservers(nameservers: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self {
            nameservers,
            timeout,
        }
    }

    pub fn from_settings(settings: &DnsSettings) -> Self {
        let nameservers = match settings.nameserver {
            Some(nameserver) => vec![nameserver],
            None => system_nameservers(),
        };
        Self::with_nameservers(nameservers, settings.timeout())
    }

    /// First nameserver of the source's address family, else the first one.
    fn nameserver_for(&self, source: IpAddr) -> SocketAddr {
        self.nameservers
            .iter()
            .find(|ns| ns.is_ipv4() == source.is_ipv4())
            .or_else(|| self.nameservers.first())
            .copied()
            .unwrap_or(FALLBACK_NAMESERVER)
    }

    /// Sends one query from `source` and waits for the matching reply.
    pub async fn query(
        &self,
        source: IpAddr,
        name: &str,
        qtype: RecordType,
    ) -> Result<ReplyHeader, DnsError> {
        let id: u16 = rand::random();
        let packet = build_query(id, name, qtype)?;

        let nameserver = self.nameserver_for(source);
        let socket = UdpSocket::bind(SocketAddr::new(source, 0)).await?;
        socket.send_to(&packet, nameserver).await?;

        tokio::time::timeout(self.timeout, recv_reply(&socket, nameserver, id))
            .await
            .map_err(|_| DnsError::Timeout(self.timeout))?
    }

}

async fn recv_reply(
    socket: &UdpSocket,
    nameserver: SocketAddr,
    id: u16,
) -> Result<ReplyHeader, DnsError> {
    let mut buf = [0u8; 512];
    loop {
        let (len, from) = socket.recv_from(&mut buf).await?;
        if from != nameserver {
            continue;
        }
        match ReplyHeader::parse(&buf[..len]) {
            Some(header) if header.id == id => return Ok(header),
            Some(_) => continue,
            None => return Err(DnsError::Malformed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_layout() {
        let packet = build_query(0xbeef, "ab.cd.", RecordType::A).unwrap();
        assert_eq!(
            packet,
            vec![
                0xbe, 0xef, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // header
                2, b'a', b'b', 2, b'c', b'd', 0, // name
                0x00, 0x01, 0x00, 0x01, // A, IN
            ]
        );

        let txt = build_query(1, "x.y", RecordType::Txt).unwrap();
        assert_eq!(&txt[txt.len() - 4..], &[0x00, 0x10, 0x00, 0x01]);
    }

    #[test]
    fn test_build_query_rejects_bad_names() {
        assert!(build_query(1, "", RecordType::A).is_err());
        assert!(build_query(1, "a..b", RecordType::A).is_err());
        assert!(build_query(1, &format!("{}.com", "a".repeat(64)), RecordType::A).is_err());
        assert!(build_query(1, &"a.".repeat(130), RecordType::A).is_err());
    }

    #[test]
    fn test_reply_header() {
        let reply = [0x12, 0x34, 0x81, 0x83, 0, 1, 0, 0, 0, 0, 0, 0];
        let header = ReplyHeader::parse(&reply).unwrap();
        assert_eq!(header.id, 0x1234);
        assert_eq!(header.rcode_name(), "NXDOMAIN");
        assert_eq!(header.answers, 0);

        // A query, not a response.
        assert!(ReplyHeader::parse(&[0x12, 0x34, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0]).is_none());
        assert!(ReplyHeader::parse(&reply[..5]).is_none());
    }

    #[test]
    fn test_parse_resolv_conf() {
        let content = "# generated\nsearch lan\nnameserver fe80::1%eth0\nnameserver 2001:db8::53\nnameserver 10.0.0.1\n";
        let expected: Vec<SocketAddr> = vec![
            "[2001:db8::53]:53".parse().unwrap(),
            "10.0.0.1:53".parse().unwrap(),
        ];
        assert_eq!(parse_resolv_conf(content), expected);
        assert_eq!(
            parse_resolv_conf("; nameserver 1.1.1.1\nnameserver 9.9.9.9"),
            vec!["9.9.9.9:53".parse::<SocketAddr>().unwrap()]
        );
        assert!(parse_resolv_conf("search lan\nnameserver fe80::1%eth0\n").is_empty());
    }

    #[test]
    fn test_nameserver_matches_source_family() {
        let v6: SocketAddr = "[2001:db8::53]:53".parse().unwrap();
        let v4: SocketAddr = "10.0.0.1:53".parse().unwrap();
        let resolver = Resolver::with_nameservers(vec![v6, v4], Duration::from_secs(1));

        assert_eq!(resolver.nameserver_for("192.168.1.20".parse().unwrap()), v4);
        assert_eq!(resolver.nameserver_for("2001:db8::20".parse().unwrap()), v6);

        // No match for the family: the first entry is used.
        let only_v6 = Resolver::with_nameservers(vec![v6], Duration::from_secs(1));
        assert_eq!(only_v6.nameserver_for("192.168.1.20".parse().unwrap()), v6);
    }

    #[tokio::test]
    async fn test_query_against_local_server() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();

        let responder = tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (len, peer) = server.recv_from(&mut buf).await.unwrap();
            let mut reply = buf[..len].to_vec();
            reply[2] = 0x81;
            reply[3] = 0x83;
            server.send_to(&reply, peer).await.unwrap();
            reply
        });

        // An IPv6 resolver listed first is passed over for an IPv4 source.
        let resolver = Resolver::with_nameservers(
            vec!["[2001:db8::53]:53".parse().unwrap(), addr],
            Duration::from_secs(2),
        );
        let header = resolver
            .query("127.0.0.1".parse().unwrap(), "nx.example.com", RecordType::A)
            .await
            .unwrap();
        assert_eq!(header.rcode, 3);

        let sent = responder.await.unwrap();
        assert_eq!(&sent[12..15], &[2, b'n', b'x']);
    }

    #[tokio::test]
    async fn test_query_times_out() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let resolver = Resolver::new(silent.local_addr().unwrap(), Duration::from_millis(50));

        let err = resolver
            .query("127.0.0.1".parse().unwrap(), "example.com", RecordType::A)
            .await
            .unwrap_err();
        assert!(matches!(err, DnsError::Timeout(_)));
    }
}
