//! TCP connect scan across private address space.

use super::rng;
use crate::config::{ScanSettings, MAX_SCAN_HOSTS};
use async_trait::async_trait;
use flightsim_core::{Simulator, SimulatorError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpSocket;
use tracing::{debug, warn};

pub const NAME: &str = "scan";

/// Gives up on drawing distinct hosts after this many draws per host.
const MAX_DRAWS_PER_HOST: usize = 16;

/// Tries a connection to every sampled port on a sample of RFC 1918 hosts.
pub struct PortScan {
    hosts: usize,
    ports: Vec<u16>,
    timeout: Duration,
    seed: Option<u64>,
}

impl PortScan {
    pub fn new(settings: &ScanSettings) -> Self {
        Self {
            hosts: settings.hosts.min(MAX_SCAN_HOSTS),
            ports: settings.ports.clone(),
            timeout: settings.timeout(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    async fn connect(&self, source: IpAddr, target: SocketAddr) -> std::io::Result<()> {
        let socket = match target {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.bind(SocketAddr::new(source, 0))?;

        match tokio::time::timeout(self.timeout, socket.connect(target)).await {
            Ok(stream) => stream.map(drop),
            Err(_) => Err(std::io::ErrorKind::TimedOut.into()),
        }
    }
}

/// A random host from 10.0.0.0/8, 172.16.0.0/12 or 192.168.0.0/16,
/// never a network or broadcast-looking address.
fn private_host<R: Rng>(rng: &mut R) -> Ipv4Addr {
    let last = rng.gen_range(1..=254);
    match rng.gen_range(0..3) {
        0 => Ipv4Addr::new(10, rng.gen(), rng.gen(), last),
        1 => Ipv4Addr::new(172, rng.gen_range(16..=31), rng.gen(), last),
        _ => Ipv4Addr::new(192, 168, rng.gen(), last),
    }
}

#[async_trait]
impl Simulator for PortScan {
    async fn targets(&self) -> Result<Vec<String>, SimulatorError> {
        if self.ports.is_empty() {
            return Err(SimulatorError::Empty("no ports configured".to_string()));
        }

        let mut rng = rng(self.seed);

        let mut hosts = Vec::new();
        for _ in 0..self.hosts.saturating_mul(MAX_DRAWS_PER_HOST) {
            if hosts.len() == self.hosts {
                break;
            }
            let host = private_host(&mut rng);
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }

        let mut ports = self.ports.clone();
        ports.sort_unstable();
        ports.dedup();
        ports.shuffle(&mut rng);

        // Host-major, so each host is narrated once.
        Ok(hosts
            .iter()
            .flat_map(|host| ports.iter().map(move |port| format!("{}:{}", host, port)))
            .collect())
    }

    async fn simulate(&self, source: IpAddr, target: &str) {
        let addr: SocketAddr = match target.parse() {
            Ok(addr) => addr,
            Err(e) => {
                warn!("{}: bad target {}: {}", NAME, target, e);
                return;
            }
        };

        match self.connect(source, addr).await {
            Ok(()) => debug!("{}: {} open", NAME, addr),
            Err(e) => debug!("{}: {} {}", NAME, addr, e),
        }
    }
}
