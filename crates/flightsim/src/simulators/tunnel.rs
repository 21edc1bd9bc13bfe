//! TXT lookups shaped like data exfiltrated over DNS.

use super::{lookup, rng, RecordType, Resolver};
use crate::config::{TunnelSettings, MAX_COUNT, MAX_LABEL_LEN};
use async_trait::async_trait;
use flightsim_core::{Simulator, SimulatorError};
use rand::Rng;
use std::net::IpAddr;

pub const NAME: &str = "tunnel";

const HEX: &[u8] = b"0123456789abcdef";

/// Queries long, encoded-looking subdomains of one parent domain.
pub struct Tunnel {
    resolver: Resolver,
    domain: String,
    count: usize,
    label_len: usize,
    seed: Option<u64>,
}

impl Tunnel {
    pub fn new(settings: &TunnelSettings, resolver: Resolver) -> Self {
        Self {
            resolver,
            domain: settings.domain.trim_matches('.').to_string(),
            count: settings.count.min(MAX_COUNT),
            label_len: settings.label_len.clamp(1, MAX_LABEL_LEN),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[async_trait]
impl Simulator for Tunnel {
    async fn targets(&self) -> Result<Vec<String>, SimulatorError> {
        if self.domain.is_empty() {
            return Err(SimulatorError::Empty("no tunnel domain configured".to_string()));
        }

        let mut rng = rng(self.seed);
        Ok((0..self.count)
            .map(|_| {
                let label: String = (0..self.label_len)
                    .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
                    .collect();
                format!("{}.{}", label, self.domain)
            })
            .collect())
    }

    async fn simulate(&self, source: IpAddr, target: &str) {
        lookup(&self.resolver, NAME, source, target, RecordType::Txt).await;
    }
}
