//! Sequential execution of a run.
//!
//! Entries run one after another in catalog order, and targets run one after
//! another in the order their simulator produced them. Every wait is awaited
//! inline, so a pause suspends the whole run rather than a single target.
//!
//! Failure handling is narrow:
//! - a simulator that cannot build its target list fails only its own entry
//! - the outcome of each simulated action is never inspected
//! - writing progress output is the only thing that aborts a run midway

use crate::catalog::{Catalog, CatalogEntry};
use crate::config::RunConfig;
use crate::error::Result;
use crate::report::{EntryOutcome, EntryReport, LatencyStats, RunReport};
use crate::reporter::Reporter;
use crate::selector;
use crate::target::display_host;
use chrono::Utc;
use hdrhistogram::Histogram;
use std::io::Write;
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Drives catalog entries against one source address.
pub struct Orchestrator<'r, W: Write> {
    config: RunConfig,
    reporter: &'r mut Reporter<W>,
}

impl<'r, W: Write> Orchestrator<'r, W> {
    pub fn new(config: RunConfig, reporter: &'r mut Reporter<W>) -> Self {
        Self { config, reporter }
    }

    /// Validates `requested` against the catalog, then runs the selection.
    ///
    /// An unknown name fails the call before any simulator is touched.
    pub async fn run_requested<S: AsRef<str>>(
        &mut self,
        catalog: &Catalog,
        requested: &[S],
        source: IpAddr,
    ) -> Result<RunReport> {
        let entries = selector::resolve(catalog, requested)?;
        self.run(&entries, source).await
    }

    /// Runs `entries` in the given order.
    pub async fn run(&mut self, entries: &[&CatalogEntry], source: IpAddr) -> Result<RunReport> {
        info!(
            "Starting run of {} simulators from {} ({} pacing)",
            entries.len(),
            source,
            self.config.pacing
        );

        let started_at = Utc::now();
        let start = Instant::now();
        let mut reports = Vec::with_capacity(entries.len());

        for entry in entries {
            reports.push(self.run_entry(entry, source).await?);
        }

        self.reporter.goodbye()?;

        let duration = start.elapsed();
        info!("Run finished in {:.1}s", duration.as_secs_f64());

        Ok(RunReport {
            source,
            pacing: self.config.pacing,
            started_at,
            duration,
            entries: reports,
        })
    }

    async fn run_entry(&mut self, entry: &CatalogEntry, source: IpAddr) -> Result<EntryReport> {
        let name = entry.name();

        self.reporter.msg(name, "Starting")?;
        self.reporter.msgs(name, entry.phases())?;
        pause(self.config.entry_delay()).await;

        let targets = match entry.simulator().targets().await {
            Ok(targets) => targets,
            Err(e) => {
                warn!("{}: failed to build targets: {}", name, e);
                self.reporter.msg(name, &format!("failed {}", e))?;
                self.reporter.msg(name, "Finished")?;
                return Ok(EntryReport {
                    name: name.to_string(),
                    outcome: EntryOutcome::Failed(e.to_string()),
                    targets: 0,
                    announcements: 0,
                    latency: LatencyStats::default(),
                });
            }
        };
        debug!("{}: {} targets", name, targets.len());

        let delay = self.config.target_delay(entry.interval());
        let mut histogram = latency_histogram();
        let mut announcements = 0;
        let mut prev_host: Option<&str> = None;

        for target in &targets {
            let host = display_host(target);
            if prev_host != Some(host) {
                self.reporter.msg(name, &entry.announce(host))?;
                announcements += 1;
            }

            let action_start = Instant::now();
            entry.simulator().simulate(source, target).await;
            if let Some(h) = histogram.as_mut() {
                let _ = h.record(action_start.elapsed().as_micros().max(1) as u64);
            }

            pause(delay).await;
            prev_host = Some(host);
        }

        self.reporter.msg(name, "Finished")?;

        Ok(EntryReport {
            name: name.to_string(),
            outcome: EntryOutcome::Completed,
            targets: targets.len(),
            announcements,
            latency: histogram
                .as_ref()
                .map(LatencyStats::from_histogram)
                .unwrap_or_default(),
        })
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

fn latency_histogram() -> Option<Histogram<u64>> {
    Histogram::<u64>::new_with_bounds(1, 60_000_000, 3).ok()
}
