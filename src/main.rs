use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use portfolio_allocator::{
    commands::{allocate, frequencies, validate},
    config::AllocatorSettings,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portfolio-allocator")]
#[command(about = "Resolve portfolio weights into dollar allocations and DCA schedules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve amounts and DCA schedules for an allocation request
    Allocate {
        /// Path to the request JSON (reads stdin when omitted)
        #[arg(short, long, value_name = "PATH")]
        input: Option<PathBuf>,
    },
    /// Report advisory issues for an allocation request
    Validate {
        /// Path to the request JSON (reads stdin when omitted)
        #[arg(short, long, value_name = "PATH")]
        input: Option<PathBuf>,
    },
    /// List the DCA frequency presets and their approximate interval
    Frequencies,
}

fn main() -> Result<()> {
    let Cli { command } = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = AllocatorSettings::from_env()?;
    info!(
        "Using default DCA frequency {} with a {}-day fallback interval",
        settings.default_dca_frequency, settings.fallback_interval_days
    );

    match command {
        Commands::Allocate { input } => allocate::run(&settings, input.as_deref())?,
        Commands::Validate { input } => validate::run(&settings, input.as_deref())?,
        Commands::Frequencies => frequencies::run()?,
    }

    Ok(())
}
