//! Repository Module
//!
//! Record store of the run database.
//! Each repository adds the operations for one entity kind to `FileRunDb`:
//! store (upsert), read, update, delete, list and bulk delete.

mod artifact;
mod function;
mod log;
mod project;
mod run;
mod schedule;

pub use log::DEFAULT_LOG_CHUNK;

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, StoreError};

// =============================================================================
// File Helpers
// =============================================================================

/// Write `data` to `path`, creating parent directories
pub(crate) fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    fs::write(path, data).map_err(|e| StoreError::io(path, e))
}

/// Read `path` as text, `None` when it is not a file
pub(crate) fn read_file(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Remove a file that must exist
pub(crate) fn safe_delete(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(StoreError::DeleteTargetMissing(path.to_path_buf()));
    }
    fs::remove_file(path).map_err(|e| StoreError::io(path, e))?;
    tracing::debug!("Deleted {}", path.display());
    Ok(())
}

/// Treat empty filter strings like missing ones
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
