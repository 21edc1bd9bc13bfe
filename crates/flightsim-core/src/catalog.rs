//! The fixed, ordered table of simulators a run can choose from.

use crate::error::{FlightError, Result};
use crate::simulator::Simulator;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Substitution slot in an entry's message template.
pub const HOST_SLOT: &str = "{}";

/// One registered simulator and the text used to narrate it.
#[derive(Clone)]
pub struct CatalogEntry {
    name: String,
    phases: Vec<String>,
    template: String,
    simulator: Arc<dyn Simulator>,
    interval: Duration,
}

impl CatalogEntry {
    pub fn new(
        name: impl Into<String>,
        phases: &[&str],
        template: impl Into<String>,
        simulator: Arc<dyn Simulator>,
        interval: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            phases: phases.iter().map(|p| p.to_string()).collect(),
            template: template.into(),
            simulator,
            interval,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lines shown once before the entry starts working.
    pub fn phases(&self) -> &[String] {
        &self.phases
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn simulator(&self) -> &dyn Simulator {
        self.simulator.as_ref()
    }

    /// Delay after each target in normal pacing.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Renders the progress message for `host`.
    pub fn announce(&self, host: &str) -> String {
        self.template.replacen(HOST_SLOT, host, 1)
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("name", &self.name)
            .field("phases", &self.phases)
            .field("template", &self.template)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Immutable, ordered collection of catalog entries.
///
/// Built once at start-up; entry order is the order runs execute in.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Creates a catalog, rejecting duplicate names and malformed templates.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.name.is_empty() {
                return Err(FlightError::InvalidCatalog("empty simulator name".to_string()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(FlightError::InvalidCatalog(format!(
                    "duplicate simulator name: {}",
                    entry.name
                )));
            }
            let slots = entry.template.matches(HOST_SLOT).count();
            if slots != 1 {
                return Err(FlightError::InvalidCatalog(format!(
                    "template for {} must contain exactly one {} slot, found {}",
                    entry.name, HOST_SLOT, slots
                )));
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name())
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
