//! Headless runner.
//!
//! Loads a configuration, applies an optional edit script, runs a fixed
//! number of ticks and prints the final stats as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pheromone_net_core::utils::benchmark::TickBenchmark;
use pheromone_net_core::{setup_logging, EditCommand, Simulation, SimulationConfig};

#[derive(Parser)]
#[command(name = "pheromone-headless")]
#[command(version)]
#[command(about = "Run the trail-diffusion kernel without a renderer")]
struct Cli {
    /// JSON configuration file (defaults apply to omitted fields)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Ticks to run
    #[arg(long, default_value = "500")]
    ticks: u64,

    /// JSON array of edit commands applied before the first tick
    #[arg(long)]
    edits: Option<PathBuf>,

    /// Override the configured seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print a stats line every N ticks (0 = only at the end)
    #[arg(long, default_value = "0")]
    stats_every: u64,

    /// Time the run and print a benchmark report instead of stats
    #[arg(long)]
    bench: bool,

    /// Log filter, e.g. "debug" or "pheromone_net_core=trace"
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(Some(cli.log.clone()));

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let mut sim = Simulation::new(config).context("building simulation")?;

    if let Some(path) = &cli.edits {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("reading edit script {}", path.display()))?;
        let cmds = EditCommand::parse_script(&script)
            .with_context(|| format!("parsing edit script {}", path.display()))?;
        info!("Applying {} edits from {}", cmds.len(), path.display());
        for (i, cmd) in cmds.into_iter().enumerate() {
            sim.apply(cmd).with_context(|| format!("edit #{}", i))?;
        }
    }

    if cli.bench {
        let report = TickBenchmark::default().run(&mut sim, cli.ticks);
        println!("{}", report.to_json());
        return Ok(());
    }

    let mut ran = 0;
    while ran < cli.ticks {
        let chunk = match cli.stats_every {
            0 => cli.ticks - ran,
            n => n.min(cli.ticks - ran),
        };
        let done = sim.run(chunk);
        ran += chunk;
        if done < chunk {
            info!("Simulation is paused; stopping after tick {}", sim.global_tick());
            break;
        }
        if cli.stats_every > 0 && ran < cli.ticks {
            println!("{}", sim.stats().to_json());
        }
    }

    println!("{}", sim.stats().to_json());
    Ok(())
}
