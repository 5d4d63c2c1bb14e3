//! Run Repository
//!
//! Runs live at `runs/<project>/<uid>[-<iter>].<ext>`, one file per iteration.

use chrono::{Duration, Utc};
use rundb_core::Document;
use rundb_core::domain::run::{Run, fields};
use rundb_core::dto::run::{RunDeletion, RunQuery, RunUpdate};

use super::{non_empty, read_file, safe_delete, write_file};
use crate::db::FileRunDb;
use crate::error::{Result, StoreError};
use crate::paths::{Table, run_stem};
use crate::query::{Mask, Predicates, predicate};

impl FileRunDb {
    /// Store a run, replacing any existing record at the same coordinates
    pub fn store_run(
        &self,
        run: &impl Document,
        uid: &str,
        project: Option<&str>,
        iter: u64,
    ) -> Result<()> {
        let data = self.dumps(run)?;
        let path = self.paths().run_file(project, uid, iter, self.ext()?);
        write_file(&path, data.as_bytes())?;

        tracing::debug!("Stored run {} at {}", run_stem(uid, iter), path.display());

        Ok(())
    }

    /// Apply attribute updates to a stored run
    ///
    /// Updating a run that does not exist does nothing and is not an error.
    pub fn update_run(
        &self,
        updates: &RunUpdate,
        uid: &str,
        project: Option<&str>,
        iter: u64,
    ) -> Result<()> {
        let mut run = match self.read_run(uid, project, iter) {
            Ok(run) => run,
            Err(StoreError::NotFound(_)) => {
                tracing::debug!("Update skipped, run {} not found", run_stem(uid, iter));
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        for (path, value) in updates.iter() {
            run.set(path, value.clone());
        }

        self.store_run(&run, uid, project, iter)
    }

    /// Read a run by its exact coordinates
    pub fn read_run(&self, uid: &str, project: Option<&str>, iter: u64) -> Result<Run> {
        let path = self.paths().run_file(project, uid, iter, self.ext()?);
        let text = read_file(&path)?.ok_or_else(|| StoreError::NotFound(uid.to_string()))?;

        Ok(Run::from(self.loads(&text)?))
    }

    /// List runs of one project
    ///
    /// Sorted by start time, most recent first, when `sort` is set or `last`
    /// is non-zero; then truncated to `last` runs.
    pub fn list_runs(&self, query: &RunQuery) -> Result<Vec<Run>> {
        let mut predicates = Predicates::new();
        if let Some(name) = non_empty(&query.name) {
            predicates.push(predicate::contains(fields::NAME, name));
        }
        if !query.labels.is_empty() {
            predicates.push(predicate::labels(fields::LABELS, query.labels.clone()));
        }
        if let Some(state) = non_empty(&query.state) {
            predicates.push(predicate::equals(fields::STATE, state));
        }
        if let Some(uid) = non_empty(&query.uid) {
            predicates.push(predicate::equals(fields::UID, uid));
        }
        if !query.include_iterations {
            predicates.push(predicate::zero_or_missing(fields::ITERATION));
        }

        let dir = self.paths().table_dir(Table::Runs, query.project.as_deref());
        let scan = self.scan(dir, Mask::Children)?;
        let mut runs: Vec<Run> = scan
            .matching(&predicates)
            .map(|(record, _)| Run::from(record))
            .collect();

        if query.sort || query.last > 0 {
            runs.sort_by(|a, b| {
                let a = a.start_time().unwrap_or_default();
                let b = b.start_time().unwrap_or_default();
                b.cmp(a)
            });
        }
        if query.last > 0 {
            runs.truncate(query.last);
        }

        Ok(runs)
    }

    /// Delete one run file. The file must exist.
    pub fn del_run(&self, uid: &str, project: Option<&str>, iter: u64) -> Result<()> {
        let path = self.paths().run_file(project, uid, iter, self.ext()?);
        safe_delete(&path)
    }

    /// Delete every run matching the filter, returning how many were removed
    ///
    /// Refuses to run without a name, state, label or age filter.
    pub fn del_runs(&self, filter: &RunDeletion) -> Result<usize> {
        if !filter.is_bounded() {
            return Err(StoreError::InvalidFilter(
                "filter is too wide, select name and/or state and/or labels and/or days_ago"
                    .to_string(),
            ));
        }

        let mut predicates = Predicates::new();
        if let Some(name) = non_empty(&filter.name) {
            predicates.push(predicate::contains(fields::NAME, name));
        }
        if !filter.labels.is_empty() {
            predicates.push(predicate::labels(fields::LABELS, filter.labels.clone()));
        }
        if let Some(state) = non_empty(&filter.state) {
            predicates.push(predicate::equals(fields::STATE, state));
        }
        if let Some(days) = filter.days_ago.filter(|d| *d > 0) {
            let cutoff = Utc::now() - Duration::days(i64::from(days));
            predicates.push(predicate::before(fields::START_TIME, cutoff));
        }

        let dir = self.paths().table_dir(Table::Runs, filter.project.as_deref());
        let scan = self.scan(dir.clone(), Mask::Children)?;
        let targets: Vec<_> = scan.matching(&predicates).map(|(_, path)| path).collect();

        for path in &targets {
            safe_delete(path)?;
        }

        tracing::info!("Deleted {} run(s) from {}", targets.len(), dir.display());

        Ok(targets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rundb_core::LabelSelector;
    use tempfile::TempDir;

    fn store(format: &str) -> (TempDir, FileRunDb) {
        let dir = TempDir::new().unwrap();
        let db = FileRunDb::new(dir.path(), format).unwrap();
        (dir, db)
    }

    fn started(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_store_and_read_run() {
        for format in ["yaml", "json"] {
            let (_dir, db) = store(format);
            let run = Run::new("train").with_uid("u1").with_label("owner", "ana");

            db.store_run(&run, "u1", None, 0).unwrap();
            assert_eq!(db.read_run("u1", None, 0).unwrap(), run);
            assert!(
                db.root()
                    .join(format!("runs/default/u1.{format}"))
                    .is_file()
            );
        }
    }

    #[test]
    fn test_read_missing_run() {
        let (_dir, db) = store("yaml");
        let err = db.read_run("nope", None, 0).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref uid) if uid == "nope"));
    }

    #[test]
    fn test_update_run_merges_paths() {
        let (_dir, db) = store("yaml");
        let run = Run::new("train").with_uid("u1").with_state("running");
        db.store_run(&run, "u1", Some("p"), 0).unwrap();

        let update = RunUpdate::new()
            .set("status.state", "completed")
            .set("status.results.accuracy", 0.9);
        db.update_run(&update, "u1", Some("p"), 0).unwrap();

        let updated = db.read_run("u1", Some("p"), 0).unwrap();
        assert_eq!(updated.state(), Some("completed"));
        assert_eq!(
            updated.get(&"status.results.accuracy".into()),
            Some(&serde_json::json!(0.9))
        );
        assert_eq!(updated.name(), Some("train"));
        assert_eq!(updated.uid(), Some("u1"));
    }

    #[test]
    fn test_update_missing_run_is_noop() {
        let (_dir, db) = store("yaml");
        let update = RunUpdate::new().set("status.state", "completed");
        db.update_run(&update, "ghost", None, 0).unwrap();

        assert!(!db.root().join("runs/default/ghost.yaml").exists());
        assert!(db.read_run("ghost", None, 0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_runs_filters() {
        let (_dir, db) = store("yaml");
        let runs = [
            Run::new("train").with_uid("a").with_state("running").with_label("owner", "ana"),
            Run::new("train-big").with_uid("b").with_state("completed").with_label("owner", "ana"),
            Run::new("eval").with_uid("c").with_state("running").with_label("owner", "bob"),
        ];
        for run in &runs {
            db.store_run(run, run.uid().unwrap(), None, 0).unwrap();
        }

        let running = db.list_runs(&RunQuery::new().state("running")).unwrap();
        assert_eq!(running.len(), 2);
        assert!(running.iter().all(|r| r.state() == Some("running")));

        let ana = LabelSelector::parse("owner=ana").unwrap();
        let owned = db.list_runs(&RunQuery::new().labels(ana.clone())).unwrap();
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|r| ana.matches(r.labels())));

        let named = db.list_runs(&RunQuery::new().name("train")).unwrap();
        assert_eq!(named.len(), 2);

        let by_uid = db.list_runs(&RunQuery::new().uid("c")).unwrap();
        assert_eq!(by_uid.len(), 1);
        assert_eq!(by_uid[0].name(), Some("eval"));
    }

    #[test]
    fn test_list_runs_iterations() {
        let (_dir, db) = store("json");
        for iter in 0..3 {
            let run = Run::new("sweep").with_uid("u1").with_iteration(iter);
            db.store_run(&run, "u1", None, iter).unwrap();
        }

        let main = db.list_runs(&RunQuery::new()).unwrap();
        assert_eq!(main.len(), 1);
        assert_eq!(main[0].iteration(), 0);

        let all = db.list_runs(&RunQuery::new().include_iterations(true)).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_list_runs_sorted_and_truncated() {
        let (_dir, db) = store("yaml");
        for (uid, day) in [("a", Some(1)), ("b", Some(3)), ("c", None), ("d", Some(2))] {
            let mut run = Run::new(uid).with_uid(uid);
            if let Some(day) = day {
                run = run.with_start_time(started(day));
            }
            db.store_run(&run, uid, None, 0).unwrap();
        }

        let runs = db.list_runs(&RunQuery::new()).unwrap();
        let uids: Vec<_> = runs.iter().map(|r| r.uid().unwrap()).collect();
        assert_eq!(uids, vec!["b", "d", "a", "c"]);

        let last = db.list_runs(&RunQuery::new().last(2)).unwrap();
        let uids: Vec<_> = last.iter().map(|r| r.uid().unwrap()).collect();
        assert_eq!(uids, vec!["b", "d"]);
    }

    #[test]
    fn test_list_runs_ignores_logs_and_other_projects() {
        let (_dir, db) = store("yaml");
        db.store_run(&Run::new("a").with_uid("a"), "a", Some("p1"), 0).unwrap();
        db.store_run(&Run::new("b").with_uid("b"), "b", Some("p2"), 0).unwrap();
        db.store_log("a", Some("p1"), b"hello", false).unwrap();

        let runs = db.list_runs(&RunQuery::new().project("p1")).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].uid(), Some("a"));
        assert_eq!(db.skipped_files(), 0);
    }

    #[test]
    fn test_del_run() {
        let (_dir, db) = store("yaml");
        db.store_run(&Run::new("a").with_uid("a"), "a", None, 0).unwrap();

        db.del_run("a", None, 0).unwrap();
        assert!(db.read_run("a", None, 0).unwrap_err().is_not_found());
        assert!(matches!(
            db.del_run("a", None, 0),
            Err(StoreError::DeleteTargetMissing(_))
        ));
    }

    #[test]
    fn test_del_runs_requires_filter() {
        let (_dir, db) = store("yaml");
        db.store_run(&Run::new("a").with_uid("a"), "a", None, 0).unwrap();

        let err = db.del_runs(&RunDeletion::new()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidFilter(_)));
        assert!(db.read_run("a", None, 0).is_ok());
    }

    #[test]
    fn test_del_runs_by_name_and_state() {
        let (_dir, db) = store("yaml");
        db.store_run(&Run::new("x").with_uid("1").with_state("error"), "1", None, 0).unwrap();
        db.store_run(&Run::new("x").with_uid("2").with_state("completed"), "2", None, 0).unwrap();
        db.store_run(&Run::new("y").with_uid("3").with_state("error"), "3", None, 0).unwrap();

        let removed = db.del_runs(&RunDeletion::new().name("x").state("error")).unwrap();
        assert_eq!(removed, 1);
        assert!(db.read_run("1", None, 0).is_err());
        assert!(db.read_run("2", None, 0).is_ok());
        assert!(db.read_run("3", None, 0).is_ok());
    }

    #[test]
    fn test_del_runs_by_age() {
        let (_dir, db) = store("yaml");
        let old = Run::new("old").with_uid("old").with_start_time(Utc::now() - Duration::days(30));
        let new = Run::new("new").with_uid("new").with_start_time(Utc::now());
        let unstarted = Run::new("unstarted").with_uid("unstarted");
        for run in [&old, &new, &unstarted] {
            db.store_run(run, run.uid().unwrap(), None, 0).unwrap();
        }

        let removed = db.del_runs(&RunDeletion::new().days_ago(7)).unwrap();
        assert_eq!(removed, 1);
        assert!(db.read_run("old", None, 0).is_err());
        assert!(db.read_run("new", None, 0).is_ok());
        assert!(db.read_run("unstarted", None, 0).is_ok());
    }
}
