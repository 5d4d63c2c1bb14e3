//! Run command handlers
//!
//! Handles all run-related CLI commands including listing, viewing details,
//! deleting, pruning and reading logs.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use rundb_core::domain::run::Run;
use rundb_core::dto::run::{DEFAULT_LAST, RunDeletion, RunQuery};
use rundb_store::FileRunDb;

use super::{format_time, parse_labels, print_empty, print_record};
use crate::id_resolver::resolve_run_uid;

/// Run subcommands
#[derive(Subcommand)]
pub enum RunCommands {
    /// List runs, most recent first
    List {
        /// Substring of the run name
        #[arg(long)]
        name: Option<String>,

        /// Exact run state
        #[arg(long)]
        state: Option<String>,

        /// Label filter (key=value, key!=value, key~=value or key)
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Exact run uid
        #[arg(long)]
        uid: Option<String>,

        /// Include iterations other than the main run
        #[arg(long)]
        all_iterations: bool,

        /// Show at most this many runs (0 shows all)
        #[arg(long, default_value_t = DEFAULT_LAST)]
        last: usize,
    },
    /// Get run details
    Get {
        /// Run uid or unambiguous prefix
        uid: String,

        #[arg(long, default_value_t = 0)]
        iter: u64,
    },
    /// Delete one run
    Delete {
        /// Run uid or unambiguous prefix
        uid: String,

        #[arg(long, default_value_t = 0)]
        iter: u64,
    },
    /// Delete every run matching the filters
    Prune {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long = "label")]
        labels: Vec<String>,

        /// Only runs started more than this many days ago
        #[arg(long)]
        days_ago: Option<u32>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print a run's log
    Logs {
        /// Run uid or unambiguous prefix
        uid: String,

        /// Byte offset to start reading at
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Bytes to read (0 reads the default chunk)
        #[arg(long, default_value_t = 0)]
        size: usize,
    },
}

/// Handle run commands
pub fn handle_run_command(command: RunCommands, db: &FileRunDb) -> Result<()> {
    match command {
        RunCommands::List {
            name,
            state,
            labels,
            uid,
            all_iterations,
            last,
        } => {
            let mut query = RunQuery::new()
                .labels(parse_labels(&labels)?)
                .include_iterations(all_iterations)
                .last(last);
            query.name = name;
            query.state = state;
            query.uid = uid;
            list_runs(db, &query)
        }
        RunCommands::Get { uid, iter } => get_run(db, &uid, iter),
        RunCommands::Delete { uid, iter } => delete_run(db, &uid, iter),
        RunCommands::Prune {
            name,
            state,
            labels,
            days_ago,
            yes,
        } => {
            let filter = RunDeletion {
                name,
                project: None,
                labels: parse_labels(&labels)?,
                state,
                days_ago,
            };
            prune_runs(db, &filter, yes)
        }
        RunCommands::Logs { uid, offset, size } => get_run_logs(db, &uid, offset, size),
    }
}

/// List runs
fn list_runs(db: &FileRunDb, query: &RunQuery) -> Result<()> {
    let runs = db.list_runs(query)?;

    if runs.is_empty() {
        print_empty("runs");
    } else {
        println!("{}", format!("Found {} run(s):", runs.len()).bold());
        println!();
        for run in &runs {
            print_run_summary(run);
        }
    }

    Ok(())
}

/// Get and display a single run
fn get_run(db: &FileRunDb, uid: &str, iter: u64) -> Result<()> {
    let uid = resolve_run_uid(db, uid, iter)?;
    let run = db.read_run(&uid, None, iter)?;

    print_run_details(&run);
    println!("\n{}", "Record:".bold());
    print_record(&run)
}

/// Delete a single run
fn delete_run(db: &FileRunDb, uid: &str, iter: u64) -> Result<()> {
    let uid = resolve_run_uid(db, uid, iter)?;
    db.del_run(&uid, None, iter)?;

    println!("{} Deleted run {}", "✓".green(), uid.cyan());

    Ok(())
}

/// Delete every run matching a filter, after confirmation
fn prune_runs(db: &FileRunDb, filter: &RunDeletion, yes: bool) -> Result<()> {
    if !filter.is_bounded() {
        anyhow::bail!("Refusing to prune without --name, --state, --label or --days-ago");
    }

    if !yes && !confirm("Delete all runs matching these filters?")? {
        println!("{}", "Aborted.".yellow());
        return Ok(());
    }

    let removed = db.del_runs(filter)?;
    println!("{} Deleted {} run(s)", "✓".green(), removed);

    Ok(())
}

/// Print a run's log
fn get_run_logs(db: &FileRunDb, uid: &str, offset: u64, size: usize) -> Result<()> {
    let uid = resolve_run_uid(db, uid, 0)?;

    match db.get_log(&uid, None, offset, size)? {
        None => println!("{}", "No logs found for this run.".yellow()),
        Some(body) => {
            println!("{}", format!("Logs for run {}:", uid).bold());
            println!("{}", "─".repeat(80).dimmed());
            print!("{}", String::from_utf8_lossy(&body));
            if !body.ends_with(b"\n") {
                println!();
            }
            println!("{}", "─".repeat(80).dimmed());
        }
    }

    Ok(())
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is no.
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Print a run summary line
fn print_run_summary(run: &Run) {
    println!("  {} Run {}", "▸".cyan(), run.uid().unwrap_or("?").dimmed());
    println!("    Name:      {}", run.name().unwrap_or_default());
    println!("    State:     {}", colorize_state(run.state()));
    if let Some(started) = run.start_time() {
        println!("    Started:   {}", format_time(started).dimmed());
    }
    if run.iteration() > 0 {
        println!("    Iteration: {}", run.iteration());
    }
    println!();
}

/// Print detailed run information
fn print_run_details(run: &Run) {
    println!("{}", "Run Details:".bold());
    println!("  UID:       {}", run.uid().unwrap_or("?").cyan());
    println!("  Name:      {}", run.name().unwrap_or_default());
    println!("  State:     {}", colorize_state(run.state()));
    println!("  Iteration: {}", run.iteration());
    if let Some(started) = run.start_time() {
        println!("  Started:   {}", format_time(started));
    }

    if let Some(labels) = run.labels().filter(|l| !l.is_empty()) {
        println!("\n{}", "Labels:".bold());
        for (key, value) in labels {
            println!("  {} = {}", key.cyan(), value.as_str().unwrap_or_default());
        }
    }
}

/// Colorize run state for display
fn colorize_state(state: Option<&str>) -> ColoredString {
    let state = state.unwrap_or("unknown");
    match state {
        "created" | "pending" => state.yellow(),
        "running" => state.cyan(),
        "completed" => state.green(),
        "error" | "failed" => state.red(),
        "aborted" => state.dimmed(),
        _ => state.normal(),
    }
}
