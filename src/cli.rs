//! Command-line interface for par-mux.
//!
//! Handles argument parsing and the `replay` / `show-config` subcommands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use par_mux_config::Config;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::scenario::{self, Scenario, TimedEvent};

/// par-mux - alert engine of a terminal multiplexer
#[derive(Parser)]
#[command(name = "par-mux")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: ~/.config/par-mux/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, global = true, value_name = "LEVEL", value_parser = parse_level)]
    pub log_level: Option<log::LevelFilter>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scenario file and print the resulting alerts
    Replay {
        /// Scenario YAML file
        scenario: PathBuf,

        /// Run on the system clock instead of the virtual clock
        #[arg(long)]
        realtime: bool,

        /// Print one JSON object per event
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as YAML
    ShowConfig,
}

fn parse_level(value: &str) -> Result<log::LevelFilter, String> {
    value
        .parse()
        .map_err(|_| format!("invalid log level '{value}'"))
}

/// Load the configuration from `path`, or from the default location
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Config::load().context("failed to load config"),
    }
}

/// Run the selected subcommand against `config`
pub fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Replay {
            scenario,
            realtime,
            json,
        } => replay(&scenario, realtime, json, config),
        Commands::ShowConfig => {
            let yaml = serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
            Ok(())
        }
    }
}

fn replay(path: &Path, realtime: bool, json: bool, config: Config) -> Result<()> {
    let scenario = Scenario::load(path)?;
    log::info!(
        "Replaying {} ({} steps, {})",
        path.display(),
        scenario.steps.len(),
        if realtime { "realtime" } else { "virtual clock" }
    );

    let events = if realtime {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("failed to start runtime")?;
        runtime.block_on(scenario::replay_realtime(&scenario, config))?
    } else {
        scenario::replay(&scenario, config)?
    };

    print_events(&events, json)
}

fn print_events(events: &[TimedEvent], json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for event in events {
        if json {
            serde_json::to_writer(&mut out, event)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{event}")?;
        }
    }
    out.flush()?;
    Ok(())
}
