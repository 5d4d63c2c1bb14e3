//! ID resolver module
//!
//! Resolves run uid prefixes to full uids by scanning the project's runs.
//! This allows users to type a short, unambiguous prefix instead of the
//! 32-character uid.

use anyhow::{Result, anyhow};
use rundb_core::dto::run::RunQuery;
use rundb_store::FileRunDb;

/// Resolve a run uid or prefix to a full uid
///
/// If a run with exactly this uid exists, returns it immediately.
/// Otherwise lists every run of the default project (all iterations) and
/// finds the single uid starting with the prefix.
///
/// # Errors
/// Returns an error if:
/// - No run matches the prefix
/// - Runs with different uids match the prefix (ambiguous)
/// - The store cannot be read
pub fn resolve_run_uid(db: &FileRunDb, uid_or_prefix: &str, iter: u64) -> Result<String> {
    match db.read_run(uid_or_prefix, None, iter) {
        Ok(_) => return Ok(uid_or_prefix.to_string()),
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let prefix = uid_or_prefix.to_lowercase();
    let query = RunQuery::new().include_iterations(true).sort(false).last(0);
    let runs = db.list_runs(&query)?;

    let mut matches: Vec<String> = runs
        .iter()
        .filter_map(|run| run.uid())
        .filter(|uid| uid.to_lowercase().starts_with(&prefix))
        .map(str::to_string)
        .collect();
    matches.sort();
    matches.dedup();

    match matches.len() {
        0 => Err(anyhow!("No run found with uid starting with '{}'", prefix)),
        1 => Ok(matches.remove(0)),
        _ => Err(anyhow!(
            "Ambiguous prefix '{}' matches multiple runs: {}",
            prefix,
            matches.join(", ")
        )),
    }
}
