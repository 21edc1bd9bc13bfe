//! Error types for flightsim-core

use thiserror::Error;

/// Errors that prevent a run from starting or abort it.
#[derive(Debug, Error)]
pub enum FlightError {
    #[error("simulator {0} not recognized")]
    UnknownSimulator(String),

    #[error("Cannot determine source address: {0}")]
    SourceAddress(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a simulator to build its target list.
///
/// Contained to the entry that produced it; the run carries on.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    #[error("no targets: {0}")]
    Empty(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, FlightError>;
