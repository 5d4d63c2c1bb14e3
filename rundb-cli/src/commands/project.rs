//! Project command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use rundb_store::FileRunDb;

use super::print_empty;

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects that have runs
    List,
}

pub fn handle_project_command(command: ProjectCommands, db: &FileRunDb) -> Result<()> {
    match command {
        ProjectCommands::List => {
            let projects = db.list_projects()?;
            if projects.is_empty() {
                print_empty("projects");
                return Ok(());
            }

            let default = db.paths().default_project();
            println!("{}", format!("Found {} project(s):", projects.len()).bold());
            for project in projects {
                if project.name == default {
                    println!("  {} {} {}", "▸".cyan(), project.name, "(default)".dimmed());
                } else {
                    println!("  {} {}", "▸".cyan(), project.name);
                }
            }
            Ok(())
        }
    }
}
