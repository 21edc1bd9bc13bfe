//! Run report generation.

use crate::config::PacingMode;
use chrono::{DateTime, Utc};
use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Latency statistics for simulated actions, in microseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub count: u64,
    pub min_us: u64,
    pub max_us: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
}

impl LatencyStats {
    /// Computes latency statistics from a histogram.
    pub fn from_histogram(histogram: &Histogram<u64>) -> Self {
        if histogram.is_empty() {
            return Self::default();
        }

        Self {
            count: histogram.len(),
            min_us: histogram.min(),
            max_us: histogram.max(),
            mean_us: histogram.mean() as u64,
            p50_us: histogram.value_at_quantile(0.50),
            p95_us: histogram.value_at_quantile(0.95),
            p99_us: histogram.value_at_quantile(0.99),
        }
    }

    /// Formats latency as a human-readable string.
    pub fn format_ms(&self) -> String {
        if self.count == 0 {
            "N/A".to_string()
        } else {
            format!(
                "p50={:.1}ms p95={:.1}ms max={:.1}ms",
                self.p50_us as f64 / 1000.0,
                self.p95_us as f64 / 1000.0,
                self.max_us as f64 / 1000.0
            )
        }
    }
}

/// How an entry ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum EntryOutcome {
    Completed,
    /// The simulator could not build its target list.
    Failed(String),
}

/// Per-entry results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryReport {
    pub name: String,
    pub outcome: EntryOutcome,
    /// Targets acted on
    pub targets: usize,
    /// Hostname announcements emitted
    pub announcements: usize,
    pub latency: LatencyStats,
}

impl EntryReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, EntryOutcome::Failed(_))
    }
}

/// Complete run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub source: IpAddr,
    pub pacing: PacingMode,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub entries: Vec<EntryReport>,
}

impl RunReport {
    pub fn total_targets(&self) -> usize {
        self.entries.iter().map(|e| e.targets).sum()
    }

    pub fn failed_entries(&self) -> usize {
        self.entries.iter().filter(|e| e.is_failed()).count()
    }

    pub fn entry(&self, name: &str) -> Option<&EntryReport> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Generates a JSON report.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Multi-line summary, one row per entry.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Source: {} | Pacing: {} | Duration: {:.1}s\n",
            self.source,
            self.pacing,
            self.duration.as_secs_f64()
        ));

        for entry in &self.entries {
            let status = match &entry.outcome {
                EntryOutcome::Completed => "ok".to_string(),
                EntryOutcome::Failed(reason) => format!("failed ({})", reason),
            };
            out.push_str(&format!(
                "  {:<7} {:>5} targets  {}  {}\n",
                entry.name,
                entry.targets,
                entry.latency.format_ms(),
                status
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, outcome: EntryOutcome, targets: usize) -> EntryReport {
        EntryReport {
            name: name.to_string(),
            outcome,
            targets,
            announcements: targets,
            latency: LatencyStats::default(),
        }
    }

    fn report() -> RunReport {
        RunReport {
            source: "10.0.0.5".parse().unwrap(),
            pacing: PacingMode::Fast,
            started_at: Utc::now(),
            duration: Duration::from_millis(1500),
            entries: vec![
                entry("c2-dns", EntryOutcome::Failed("offline".to_string()), 0),
                entry("dga", EntryOutcome::Completed, 10),
            ],
        }
    }

    #[test]
    fn test_totals() {
        let report = report();
        assert_eq!(report.total_targets(), 10);
        assert_eq!(report.failed_entries(), 1);
        assert!(report.entry("c2-dns").unwrap().is_failed());
        assert!(report.entry("scan").is_none());
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json()).unwrap();
        assert_eq!(json["pacing"], "fast");
        assert_eq!(json["entries"][0]["outcome"]["status"], "failed");
        assert_eq!(json["entries"][0]["outcome"]["reason"], "offline");
        assert_eq!(json["entries"][1]["outcome"]["status"], "completed");
    }

    #[test]
    fn test_latency_from_histogram() {
        let mut histogram = Histogram::<u64>::new_with_bounds(1, 60_000_000, 3).unwrap();
        for us in [1_000, 2_000, 3_000] {
            histogram.record(us).unwrap();
        }
        let stats = LatencyStats::from_histogram(&histogram);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min_us, 1_000);
        assert!(stats.max_us >= 3_000);
        assert_eq!(LatencyStats::default().format_ms(), "N/A");
    }

    #[test]
    fn test_summary_lists_entries() {
        let summary = report().summary();
        assert!(summary.contains("failed (offline)"));
        assert!(summary.contains("dga"));
    }
}
