//! Function command handlers

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::*;
use rundb_core::domain::function::Function;
use rundb_core::dto::function::FunctionQuery;
use rundb_store::FileRunDb;

use super::{format_time, parse_labels, print_empty, print_record};

/// Function subcommands
#[derive(Subcommand)]
pub enum FunctionCommands {
    /// List functions, or the tags of one function with --name
    List {
        #[arg(long)]
        name: Option<String>,

        /// Only this tag (`*` for every tag)
        #[arg(long)]
        tag: Option<String>,

        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Get a function definition
    Get {
        name: String,

        #[arg(long)]
        tag: Option<String>,
    },
}

/// Handle function commands
pub fn handle_function_command(command: FunctionCommands, db: &FileRunDb) -> Result<()> {
    match command {
        FunctionCommands::List { name, tag, labels } => {
            let query = FunctionQuery {
                name,
                project: None,
                tag,
                labels: parse_labels(&labels)?,
            };
            list_functions(db, &query)
        }
        FunctionCommands::Get { name, tag } => get_function(db, &name, tag.as_deref()),
    }
}

fn list_functions(db: &FileRunDb, query: &FunctionQuery) -> Result<()> {
    let functions = db.list_functions(query)?;

    if functions.is_empty() {
        print_empty("functions");
    } else {
        println!("{}", format!("Found {} function(s):", functions.len()).bold());
        println!();
        for function in &functions {
            print_function_summary(function);
        }
    }

    Ok(())
}

fn get_function(db: &FileRunDb, name: &str, tag: Option<&str>) -> Result<()> {
    let Some(function) = db.get_function(name, None, tag)? else {
        bail!("Function '{}' not found", name);
    };

    print_function_summary(&function);
    print_record(&function)
}

fn print_function_summary(function: &Function) {
    let tag = match function.tag() {
        Some(tag) if !tag.is_empty() => tag.cyan(),
        _ => "untagged".dimmed(),
    };

    println!("  {} {}:{}", "▸".cyan(), function.name().unwrap_or("?"), tag);
    if let Some(updated) = function.updated() {
        println!("    Updated: {}", format_time(updated).dimmed());
    }
}
