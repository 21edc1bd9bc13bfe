//! Lookups of algorithmically generated domain names.

use super::{lookup, rng, RecordType, Resolver};
use crate::config::{DgaSettings, MAX_COUNT};
use async_trait::async_trait;
use flightsim_core::{Simulator, SimulatorError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::net::IpAddr;

pub const NAME: &str = "dga";

const MIN_LABEL_LEN: usize = 7;
const MAX_LABEL_LEN: usize = 14;

/// Resolves random-looking names the way DGA malware does.
pub struct Dga {
    resolver: Resolver,
    count: usize,
    tlds: Vec<String>,
    seed: Option<u64>,
}

impl Dga {
    pub fn new(settings: &DgaSettings, resolver: Resolver) -> Self {
        Self {
            resolver,
            count: settings.count.min(MAX_COUNT),
            tlds: settings
                .tlds
                .iter()
                .map(|t| t.trim_start_matches('.').to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[async_trait]
impl Simulator for Dga {
    async fn targets(&self) -> Result<Vec<String>, SimulatorError> {
        if self.tlds.is_empty() {
            return Err(SimulatorError::Empty("no top-level domains configured".to_string()));
        }

        let mut rng = rng(self.seed);
        let mut names = Vec::new();
        for _ in 0..self.count {
            let len = rng.gen_range(MIN_LABEL_LEN..=MAX_LABEL_LEN);
            let label: String = (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
            let tld = self.tlds.choose(&mut rng).map(String::as_str).unwrap_or("com");
            names.push(format!("{}.{}", label, tld));
        }
        Ok(names)
    }

    async fn simulate(&self, source: IpAddr, target: &str) {
        lookup(&self.resolver, NAME, source, target, RecordType::A).await;
    }
}
