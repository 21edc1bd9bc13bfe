//! The capability set every traffic simulator exposes.

use crate::error::SimulatorError;
use async_trait::async_trait;
use std::net::IpAddr;

/// A source of simulated network activity.
///
/// Implementations build a finite, ordered list of targets and then act on
/// them one at a time. The orchestrator never inspects the result of
/// [`Simulator::simulate`]; implementations log their own outcomes.
#[async_trait]
pub trait Simulator: Send + Sync {
    /// Builds the targets for one run, each a host or a `host:port` pair.
    async fn targets(&self) -> Result<Vec<String>, SimulatorError>;

    /// Performs one simulated action against `target`, originating from `source`.
    ///
    /// Must return in bounded time under normal conditions.
    async fn simulate(&self, source: IpAddr, target: &str);
}
