//! Lookups of domains resembling command-and-control infrastructure.

use super::{lookup, rng, RecordType, Resolver};
use crate::config::C2Settings;
use async_trait::async_trait;
use flightsim_core::{Simulator, SimulatorError};
use rand::seq::SliceRandom;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

pub const NAME: &str = "c2-dns";

/// Sample used when no domain file is configured.
const BUNDLED_DOMAINS: &[&str] = &[
    "update-check-cdn.top",
    "secure-login-verify.xyz",
    "cdn-static-assets.su",
    "mail-sync-service.ru",
    "api-telemetry-node.cc",
    "win-defender-update.info",
    "cloud-storage-sync.pw",
    "office365-auth-check.biz",
    "dropbox-file-share.club",
    "login-microsoft-verify.online",
    "paypal-secure-center.site",
    "apple-id-unlock.live",
    "bank-account-review.work",
    "adobe-flash-update.stream",
    "java-runtime-patch.download",
    "chrome-extension-store.win",
    "system-health-monitor.space",
    "driver-update-center.bid",
    "vpn-gateway-node.racing",
    "crypto-wallet-sync.loan",
];

/// Resolves a random sample of known-bad-looking domains.
pub struct C2Dns {
    resolver: Resolver,
    sample_size: usize,
    domains_file: Option<PathBuf>,
    seed: Option<u64>,
}

impl C2Dns {
    pub fn new(settings: &C2Settings, resolver: Resolver) -> Self {
        Self {
            resolver,
            sample_size: settings.sample_size,
            domains_file: settings.domains_file.clone(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn domains(&self) -> Result<Vec<String>, SimulatorError> {
        let domains = match &self.domains_file {
            Some(path) => load_domains(path)?,
            None => BUNDLED_DOMAINS.iter().map(|d| d.to_string()).collect(),
        };

        if domains.is_empty() {
            return Err(SimulatorError::Empty("C2 domain list is empty".to_string()));
        }
        Ok(domains)
    }
}

/// Reads one domain per line, skipping blanks and `#` comments.
fn load_domains(path: &Path) -> Result<Vec<String>, SimulatorError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SimulatorError::Unavailable(format!("{}: {}", path.display(), e)))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_end_matches('.').to_lowercase())
        .collect())
}

#[async_trait]
impl Simulator for C2Dns {
    async fn targets(&self) -> Result<Vec<String>, SimulatorError> {
        let domains = self.domains()?;
        let mut rng = rng(self.seed);
        Ok(domains
            .choose_multiple(&mut rng, self.sample_size)
            .cloned()
            .collect())
    }

    async fn simulate(&self, source: IpAddr, target: &str) {
        lookup(&self.resolver, NAME, source, target, RecordType::A).await;
    }
}
