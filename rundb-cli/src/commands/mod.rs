//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod artifact;
mod function;
mod project;
mod run;
mod schedule;

pub use artifact::ArtifactCommands;
pub use function::FunctionCommands;
pub use project::ProjectCommands;
pub use run::RunCommands;
pub use schedule::ScheduleCommands;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::*;
use rundb_core::{LabelSelector, Record};
use rundb_store::query::predicate::parse_timestamp;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run records and logs
    Run {
        #[command(subcommand)]
        command: RunCommands,
    },
    /// Logged artifacts
    Artifact {
        #[command(subcommand)]
        command: ArtifactCommands,
    },
    /// Registered functions
    Function {
        #[command(subcommand)]
        command: FunctionCommands,
    },
    /// Projects with runs
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Stored schedules
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },
}

/// Handle a CLI command
///
/// Opens the store and routes the command to the appropriate handler module.
pub fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let db = config.open()?;

    match command {
        Commands::Run { command } => run::handle_run_command(command, &db),
        Commands::Artifact { command } => artifact::handle_artifact_command(command, &db),
        Commands::Function { command } => function::handle_function_command(command, &db),
        Commands::Project { command } => project::handle_project_command(command, &db),
        Commands::Schedule { command } => schedule::handle_schedule_command(command, &db),
    }
}

/// Combine repeated `--label` options into one selector
fn parse_labels(labels: &[String]) -> Result<LabelSelector> {
    LabelSelector::parse(&labels.join(",")).context("Invalid --label filter")
}

/// Print a record as indented JSON
fn print_record(record: &Record) -> Result<()> {
    let pretty = serde_json::to_string_pretty(record.as_value())?;
    println!("{}", pretty);
    Ok(())
}

/// Print the "nothing found" line shared by every listing
fn print_empty(what: &str) {
    println!("{}", format!("No {} found.", what).yellow());
}

/// Render a stored timestamp as `YYYY-MM-DD HH:MM:SS`, or as-is when it
/// does not parse
fn format_time(text: &str) -> String {
    parse_timestamp(text)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| text.to_string())
}

/// Parse a `--since`/`--until` option
fn parse_time_option(option: &str, text: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    text.map(|text| {
        parse_timestamp(text)
            .with_context(|| format!("Invalid {} timestamp '{}'", option, text))
    })
    .transpose()
}
