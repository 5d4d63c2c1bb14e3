//! Project Repository
//!
//! Projects are implicit: every directory under `runs/` is one.

use std::fs;

use rundb_core::domain::project::Project;

use crate::db::FileRunDb;
use crate::error::{Result, StoreError};

impl FileRunDb {
    /// Projects that have a run directory, sorted by name
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let root = self.paths().runs_root();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&root).map_err(|e| StoreError::io(&root, e))?;
        let mut projects = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&root, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                projects.push(Project::new(name));
            }
        }
        projects.sort();

        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rundb_core::domain::run::Run;
    use tempfile::TempDir;

    #[test]
    fn test_no_runs_dir() {
        let dir = TempDir::new().unwrap();
        let db = FileRunDb::new(dir.path(), "yaml").unwrap();
        assert!(db.list_projects().unwrap().is_empty());
    }

    #[test]
    fn test_projects_from_run_dirs() {
        let dir = TempDir::new().unwrap();
        let db = FileRunDb::new(dir.path(), "yaml").unwrap();
        db.store_run(&Run::new("a").with_uid("a"), "a", Some("zeta"), 0).unwrap();
        db.store_run(&Run::new("b").with_uid("b"), "b", None, 0).unwrap();
        std::fs::write(dir.path().join("runs/stray.yaml"), "x: 1").unwrap();

        let projects = db.list_projects().unwrap();
        assert_eq!(projects, vec![Project::new("default"), Project::new("zeta")]);
    }
}
