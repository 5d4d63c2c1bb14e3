//! Store handle
//!
//! `FileRunDb` owns the root directory layout, the selected format and the
//! scan counters. The entity operations live in `repository`.

use std::path::{Path, PathBuf};

use rundb_core::{Document, Record};

use crate::codec::FormatSelection;
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::paths::PathResolver;
use crate::query::{Mask, Scan, ScanStats};

/// File-backed run, artifact and function database
#[derive(Debug, Clone)]
pub struct FileRunDb {
    paths: PathResolver,
    format: FormatSelection,
    stats: ScanStats,
}

impl FileRunDb {
    /// Open a store, creating the root and the schedules directory
    ///
    /// The format is resolved here once. An unsupported format does not fail
    /// the open; it fails every later encode or decode.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let db = Self {
            paths: PathResolver::new(&config.dirpath, &config.default_project),
            format: FormatSelection::parse(&config.format),
            stats: ScanStats::default(),
        };

        ensure_layout(&db.paths)?;

        tracing::debug!(
            "Opened run db at {} (format: {}, default project: {})",
            config.dirpath.display(),
            config.format,
            config.default_project
        );

        Ok(db)
    }

    /// Open with the default project
    pub fn new(dirpath: impl Into<PathBuf>, format: &str) -> Result<Self> {
        Self::open(&StoreConfig::new(dirpath).with_format(format))
    }

    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    pub fn paths(&self) -> &PathResolver {
        &self.paths
    }

    pub fn format(&self) -> &FormatSelection {
        &self.format
    }

    /// Files skipped by scans since the store was opened
    pub fn skipped_files(&self) -> u64 {
        self.stats.skipped()
    }

    pub(crate) fn ext(&self) -> Result<&'static str> {
        self.format.extension()
    }

    pub(crate) fn dumps(&self, document: &dyn Document) -> Result<String> {
        self.format.dumps(document)
    }

    pub(crate) fn loads(&self, text: &str) -> Result<Record> {
        self.format.loads(text)
    }

    pub(crate) fn scan(&self, root: PathBuf, mask: Mask) -> Result<Scan> {
        Ok(Scan::new(root, mask, self.format.codec()?, self.stats.clone()))
    }
}

fn ensure_layout(paths: &PathResolver) -> Result<()> {
    let schedules = paths.schedules_dir();
    std::fs::create_dir_all(&schedules).map_err(|e| StoreError::io(schedules, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_layout() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("db");
        let db = FileRunDb::new(&root, "yaml").unwrap();

        assert!(root.join("schedules").is_dir());
        assert_eq!(db.ext().unwrap(), "yaml");
        assert_eq!(db.paths().default_project(), "default");
        assert_eq!(db.skipped_files(), 0);
    }

    #[test]
    fn test_open_with_unsupported_format() {
        let dir = TempDir::new().unwrap();
        let db = FileRunDb::new(dir.path(), ".xml").unwrap();
        assert!(matches!(db.ext(), Err(StoreError::UnsupportedFormat(_))));
        assert!(matches!(
            db.dumps(&Record::new()),
            Err(StoreError::UnsupportedFormat(_))
        ));
    }
}
