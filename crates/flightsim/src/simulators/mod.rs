//! Concrete traffic simulators.
//!
//! Each one builds its targets from configuration and a random source, then
//! acts on them with a real network operation bound to the run's source
//! address. Outcomes are logged here; the orchestrator never sees them.

pub mod c2dns;
pub mod dga;
pub mod dns;
pub mod scan;
pub mod tunnel;

pub use c2dns::C2Dns;
pub use dga::Dga;
pub use dns::{RecordType, Resolver};
pub use scan::PortScan;
pub use tunnel::Tunnel;

use dns::DnsError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::IpAddr;
use tracing::{debug, warn};

/// Fresh generator for one target list; seeded when reproducibility matters.
fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Sends one lookup and logs how it went.
async fn lookup(resolver: &Resolver, module: &str, source: IpAddr, name: &str, qtype: RecordType) {
    match resolver.query(source, name, qtype).await {
        Ok(reply) => debug!(
            "{}: {:?} {} -> {} ({} answers)",
            module,
            qtype,
            name,
            reply.rcode_name(),
            reply.answers
        ),
        Err(DnsError::Timeout(after)) => {
            debug!("{}: {:?} {} got no reply within {:?}", module, qtype, name, after)
        }
        Err(e) => warn!("{}: {:?} {} failed: {}", module, qtype, name, e),
    }
}
