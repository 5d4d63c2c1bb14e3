//! Rundb CLI
//!
//! Command-line interface for inspecting and maintaining a run database.

mod commands;
mod config;
mod id_resolver;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use rundb_store::config::{DEFAULT_FORMAT, DEFAULT_PROJECT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rundb")]
#[command(about = "File-backed run database CLI", long_about = None)]
struct Cli {
    /// Root directory of the run database
    #[arg(long, env = "RUNDB_DIRPATH")]
    dirpath: PathBuf,

    /// Record format (yaml or json)
    #[arg(long, env = "RUNDB_FORMAT", default_value = DEFAULT_FORMAT)]
    format: String,

    /// Project used when none is given
    #[arg(long, env = "RUNDB_DEFAULT_PROJECT", default_value = DEFAULT_PROJECT)]
    project: String,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rundb_store=info,rundb_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new(cli.dirpath, cli.format, cli.project);

    handle_command(cli.command, &config)
}
