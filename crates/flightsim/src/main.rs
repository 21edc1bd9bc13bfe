//! CLI entry point for the network flight simulator.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flightsim::{default_catalog, resolve_source, Config};
use flightsim_core::{selector, Orchestrator, PacingMode, Reporter, RunConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "flightsim")]
#[command(about = "Generates network traffic that security monitoring should detect")]
#[command(version)]
struct Cli {
    /// Configuration file (default: flightsim.yml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all simulators (default) or the named ones
    Run {
        /// Simulators to run: c2-dns, dga, scan, tunnel
        simulators: Vec<String>,

        /// Run without pauses between targets and simulators
        #[arg(long)]
        fast: bool,

        /// Network interface whose address is used as the source
        #[arg(short, long)]
        interface: Option<String>,

        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List available simulators
    List,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::discover(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let catalog = default_catalog(&config)?;

    match cli.command {
        Commands::List => {
            for entry in catalog.entries() {
                println!("{}", entry.name());
                for phase in entry.phases() {
                    println!("    {}", phase);
                }
            }
        }

        Commands::Run {
            simulators,
            fast,
            interface,
            report,
        } => {
            selector::validate(&catalog, simulators.as_slice())?;
            let source = resolve_source(interface.as_deref())?;
            let entries = selector::select(&catalog, simulators.as_slice());

            let pacing = if fast {
                PacingMode::Fast
            } else {
                PacingMode::Normal
            };

            let mut reporter = Reporter::stdout();
            reporter.welcome(source)?;
            reporter.header()?;

            let run_report = Orchestrator::new(RunConfig::new(pacing), &mut reporter)
                .run(&entries, source)
                .await?;
            info!("Run summary:\n{}", run_report.summary());

            if let Some(path) = report {
                std::fs::write(&path, run_report.to_json())
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                info!("JSON report saved to: {}", path.display());
            }
        }
    }

    Ok(())
}
