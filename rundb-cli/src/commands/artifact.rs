//! Artifact command handlers
//!
//! Handles listing, viewing and deleting logged artifacts.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use rundb_core::domain::artifact::{Artifact, LATEST_TAG};
use rundb_core::dto::artifact::ArtifactQuery;
use rundb_store::FileRunDb;

use super::{format_time, parse_labels, parse_time_option, print_empty, print_record};

/// Artifact subcommands
#[derive(Subcommand)]
pub enum ArtifactCommands {
    /// List artifacts of a tag (`*` lists every tag and run copy)
    List {
        /// Substring of the artifact key
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        tag: Option<String>,

        /// Label filter (key=value, key!=value, key~=value or key)
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Updated at or after this time (RFC 3339, naive times are UTC)
        #[arg(long)]
        since: Option<String>,

        /// Updated at or before this time
        #[arg(long)]
        until: Option<String>,
    },
    /// Get an artifact by key
    Get {
        key: String,

        /// Tag or producing run uid
        #[arg(long)]
        tag: Option<String>,

        #[arg(long)]
        iter: Option<u64>,
    },
    /// Delete one artifact copy
    Delete {
        key: String,

        /// Tag or producing run uid
        #[arg(long)]
        tag: Option<String>,
    },
}

/// Handle artifact commands
pub fn handle_artifact_command(command: ArtifactCommands, db: &FileRunDb) -> Result<()> {
    match command {
        ArtifactCommands::List {
            name,
            tag,
            labels,
            since,
            until,
        } => {
            let query = ArtifactQuery {
                name,
                project: None,
                tag,
                labels: parse_labels(&labels)?,
                since: parse_time_option("--since", since.as_deref())?,
                until: parse_time_option("--until", until.as_deref())?,
            };
            list_artifacts(db, &query)
        }
        ArtifactCommands::Get { key, tag, iter } => get_artifact(db, &key, tag.as_deref(), iter),
        ArtifactCommands::Delete { key, tag } => delete_artifact(db, &key, tag.as_deref()),
    }
}

/// List artifacts
fn list_artifacts(db: &FileRunDb, query: &ArtifactQuery) -> Result<()> {
    let artifacts = db.list_artifacts(query)?;

    if artifacts.is_empty() {
        print_empty("artifacts");
    } else {
        println!(
            "{}",
            format!("Found {} artifact(s) (tag: {}):", artifacts.len(), artifacts.tag).bold()
        );
        println!();
        for artifact in artifacts.iter() {
            print_artifact_summary(artifact);
        }
    }

    Ok(())
}

/// Get and display a single artifact
fn get_artifact(db: &FileRunDb, key: &str, tag: Option<&str>, iter: Option<u64>) -> Result<()> {
    let artifact = db.read_artifact(key, tag, iter, None)?;

    println!(
        "{} {}",
        "Artifact".bold(),
        artifact.key().unwrap_or(key).cyan()
    );
    print_record(&artifact)
}

/// Delete a single artifact copy
fn delete_artifact(db: &FileRunDb, key: &str, tag: Option<&str>) -> Result<()> {
    db.del_artifact(key, tag, None)?;

    println!(
        "{} Deleted artifact {} ({})",
        "✓".green(),
        key.cyan(),
        tag.unwrap_or(LATEST_TAG)
    );

    Ok(())
}

/// Print an artifact summary line
fn print_artifact_summary(artifact: &Artifact) {
    let marker = if artifact.tree() == Some(LATEST_TAG) {
        format!(" [{}]", LATEST_TAG).green()
    } else {
        "".normal()
    };

    println!(
        "  {} {}{}",
        "▸".cyan(),
        artifact.key().unwrap_or("?"),
        marker
    );
    if let Some(updated) = artifact.updated() {
        println!("    Updated: {}", format_time(updated).dimmed());
    }
    if let Some(labels) = artifact.labels().filter(|l| !l.is_empty()) {
        let labels: Vec<String> = labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.as_str().unwrap_or_default()))
            .collect();
        println!("    Labels:  {}", labels.join(", ").dimmed());
    }
}
