mod analysis;
mod config;
mod engine;
mod error;
mod grid;
mod manager;
mod model;
mod profile;
mod stepper;

use crate::manager::Manager;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    sim_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the default config.toml.
    Init,

    /// Simulate every species and save the snapshots.
    Run,

    Analyze,

    Clean,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let sim_dir = args.sim_dir;
    let mgr = || Manager::new(&sim_dir).context("failed to construct mgr");

    match args.command {
        Command::Init => Manager::write_default_config(&sim_dir)?,
        Command::Run => mgr()?.run_simulation()?,
        Command::Analyze => mgr()?.run_analysis()?,
        Command::Clean => mgr()?.clean_sim()?,
    }

    Ok(())
}
