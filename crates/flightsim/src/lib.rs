//! Network flight simulator.
//!
//! Generates traffic that security monitoring should flag, so detections can
//! be validated end to end. The crate wires concrete simulators into the
//! `flightsim-core` orchestrator.
//!
//! # Simulators
//! - `c2-dns`: lookups of domains resembling command-and-control infrastructure
//! - `dga`: lookups of algorithmically generated names
//! - `scan`: TCP connect attempts against private address space
//! - `tunnel`: TXT lookups shaped like DNS tunnelling
//!
//! # Usage
//! ```bash
//! # Run every simulator
//! flightsim run
//!
//! # Run two of them without pauses, from a given interface
//! flightsim run dga tunnel --fast -i eth0
//!
//! # Show the catalog
//! flightsim list
//! ```

pub mod catalog;
pub mod config;
pub mod simulators;
pub mod source;

pub use catalog::default_catalog;
pub use config::Config;
pub use source::resolve_source;
