//! Configuration module
//!
//! Turns the global CLI options into a store configuration and opens the store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rundb_store::{FileRunDb, StoreConfig};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
}

impl Config {
    pub fn new(dirpath: PathBuf, format: String, project: String) -> Self {
        Self {
            store: StoreConfig::new(dirpath)
                .with_format(format)
                .with_default_project(project),
        }
    }

    /// Validate the options and open the store
    pub fn open(&self) -> Result<FileRunDb> {
        self.store.validate()?;

        let db = FileRunDb::open(&self.store).with_context(|| {
            format!(
                "Failed to open run database at {}",
                self.store.dirpath.display()
            )
        })?;

        tracing::debug!("Using project '{}'", self.store.default_project);

        Ok(db)
    }
}
