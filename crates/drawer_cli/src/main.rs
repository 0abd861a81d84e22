//! Drawer CLI
//!
//! Replays pointer scenarios against a sheet container and validates sheet
//! configuration files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drawer_core::SheetConfig;
use tracing_subscriber::EnvFilter;

mod content;
mod report;
mod runner;
mod scenario;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "drawer")]
#[command(author, version, about = "Replay and inspect nested-scroll sheet behaviour", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON scenario and print the emitted sheet events
    Replay {
        /// Scenario file
        scenario: PathBuf,

        /// Sheet configuration (TOML); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a sheet configuration file and print the effective values
    CheckConfig {
        /// Configuration file (TOML)
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Replay {
            scenario,
            config,
            pretty,
        } => cmd_replay(&scenario, config.as_deref(), pretty),
        Commands::CheckConfig { path } => cmd_check_config(&path),
    }
}

fn load_config(path: &Path) -> Result<SheetConfig> {
    SheetConfig::from_path(path)
        .with_context(|| format!("invalid sheet configuration: {}", path.display()))
}

fn cmd_replay(scenario_path: &Path, config_path: Option<&Path>, pretty: bool) -> Result<()> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => SheetConfig::default(),
    };
    let scenario = Scenario::from_path(scenario_path)?;
    tracing::info!(
        "replaying {} ({} steps)",
        scenario_path.display(),
        scenario.steps.len()
    );

    let report = runner::replay(&scenario, config)
        .with_context(|| format!("replay failed: {}", scenario_path.display()))?;
    let stdout = std::io::stdout();
    report.write_to_writer(&mut stdout.lock(), pretty)?;
    Ok(())
}

fn cmd_check_config(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    let effective = toml::to_string_pretty(&config).context("failed to render configuration")?;
    println!("{} is valid", path.display());
    print!("{effective}");
    Ok(())
}
