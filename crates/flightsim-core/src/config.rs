//! Run-wide pacing settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default pause before each entry's targets are fetched.
pub const DEFAULT_ENTRY_DELAY: Duration = Duration::from_secs(2);

/// How a run spaces out its work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacingMode {
    /// Catalog intervals apply, plus the pre-entry delay.
    #[default]
    Normal,
    /// Every delay collapses to zero.
    Fast,
}

impl fmt::Display for PacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacingMode::Normal => write!(f, "normal"),
            PacingMode::Fast => write!(f, "fast"),
        }
    }
}

/// Settings fixed for the duration of a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub pacing: PacingMode,

    /// Pause before fetching each entry's targets (normal pacing only)
    pub entry_delay: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pacing: PacingMode::Normal,
            entry_delay: DEFAULT_ENTRY_DELAY,
        }
    }
}

impl RunConfig {
    pub fn new(pacing: PacingMode) -> Self {
        Self {
            pacing,
            ..Default::default()
        }
    }

    pub fn fast() -> Self {
        Self::new(PacingMode::Fast)
    }

    /// Wait applied once per entry, before its targets are requested.
    pub fn entry_delay(&self) -> Duration {
        match self.pacing {
            PacingMode::Normal => self.entry_delay,
            PacingMode::Fast => Duration::ZERO,
        }
    }

    /// Wait applied after each target, given the entry's declared interval.
    pub fn target_delay(&self, interval: Duration) -> Duration {
        match self.pacing {
            PacingMode::Normal => interval,
            PacingMode::Fast => Duration::ZERO,
        }
    }
}
