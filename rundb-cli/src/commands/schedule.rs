//! Schedule command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use rundb_store::FileRunDb;

use super::{print_empty, print_record};

/// Schedule subcommands
#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// Print every stored schedule
    List,
}

pub fn handle_schedule_command(command: ScheduleCommands, db: &FileRunDb) -> Result<()> {
    match command {
        ScheduleCommands::List => {
            let mut count = 0;
            for (id, schedule) in db.list_schedule_entries()? {
                count += 1;
                println!("{}", schedule_heading(id).bold());
                print_record(&schedule)?;
            }
            if count == 0 {
                print_empty("schedules");
            }
            Ok(())
        }
    }
}

/// Heading for one listed schedule, named by its stored id
fn schedule_heading(id: Option<u64>) -> String {
    match id {
        Some(id) => format!("Schedule #{}", id),
        None => "Schedule (unnumbered file)".to_string(),
    }
}
