//! Flightsim Core - Execution orchestrator for network traffic simulators
//!
//! This crate sequences pluggable simulators against one source address:
//! - `Simulator`: the two capabilities a simulator exposes (build targets, act on one)
//! - `Catalog`: the fixed, ordered table of registered simulators
//! - `selector`: narrows the catalog to the requested names, in catalog order
//! - `Orchestrator`: runs the selection with pacing and per-entry failure isolation
//! - `Reporter`: timestamped progress lines
//! - `RunReport`: per-entry outcomes and action latency

pub mod catalog;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod reporter;
pub mod selector;
pub mod simulator;
pub mod target;

pub use catalog::{Catalog, CatalogEntry};
pub use config::{PacingMode, RunConfig, DEFAULT_ENTRY_DELAY};
pub use error::{FlightError, Result, SimulatorError};
pub use orchestrator::Orchestrator;
pub use report::{EntryOutcome, EntryReport, LatencyStats, RunReport};
pub use reporter::Reporter;
pub use simulator::Simulator;
pub use target::{display_host, split_host_port};
