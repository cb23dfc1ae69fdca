use anyhow::Result;
use clap::Parser;
use par_mux::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level takes precedence, then RUST_LOG, then the config file
    let level = par_mux::debug::init_log_bridge(cli.log_level);

    let config = cli::load_config(cli.config.as_deref())?;
    if cli.log_level.is_none() && std::env::var_os("RUST_LOG").is_none() {
        par_mux::debug::set_level(config.log_level.to_level_filter());
    }
    log::info!("Starting par-mux {} (log level {level})", par_mux::VERSION);

    if let Err(e) = cli::run(cli.command, config) {
        eprintln!("par-mux: error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
