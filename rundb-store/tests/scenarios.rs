//! End-to-end behavior of the file-backed run database through its public API.

use rundb_core::domain::artifact::Artifact;
use rundb_core::domain::run::Run;
use rundb_core::dto::artifact::ArtifactQuery;
use rundb_core::dto::run::{RunDeletion, RunQuery, RunUpdate};
use rundb_core::{LabelSelector, Record};
use rundb_store::{FileRunDb, StoreConfig, StoreError};
use serde_json::json;
use tempfile::TempDir;

fn open(format: &str) -> (TempDir, FileRunDb) {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::new(dir.path()).with_format(format);
    let db = FileRunDb::open(&config).unwrap();
    (dir, db)
}

fn nested_run() -> Run {
    Run::from(Record::from(json!({
        "metadata": {
            "name": "train",
            "uid": "u1",
            "iteration": 0,
            "labels": {"owner": "ana", "team": "ml"}
        },
        "spec": {"parameters": {"lr": 0.01, "epochs": 10, "layers": [64, 32]}},
        "status": {"state": "running", "results": {}}
    })))
}

#[test]
fn stored_runs_read_back_unchanged() {
    for format in ["yaml", "json", ".yml"] {
        let (_dir, db) = open(format);
        let run = nested_run();
        db.store_run(&run, "u1", Some("p"), 0).unwrap();
        assert_eq!(db.read_run("u1", Some("p"), 0).unwrap(), run, "format {format}");
    }
}

#[test]
fn update_changes_only_the_given_paths() {
    let (dir, db) = open("yaml");
    db.update_run(&RunUpdate::new().set("status.state", "done"), "ghost", None, 0)
        .unwrap();
    assert!(!dir.path().join("runs/default/ghost.yaml").exists());

    let run = nested_run();
    db.store_run(&run, "u1", None, 0).unwrap();
    db.update_run(&RunUpdate::new().set("status.state", "done"), "u1", None, 0)
        .unwrap();

    let mut expected = run.into_record();
    expected.set(&"status.state".into(), "done");
    assert_eq!(db.read_run("u1", None, 0).unwrap().into_record(), expected);
}

#[test]
fn latest_tag_points_at_last_store() {
    let (_dir, db) = open("json");
    let a = Artifact::new("k").with_attr("body", "A");
    let b = Artifact::new("k").with_attr("body", "B");
    db.store_artifact("k", &a, "u1", None, None, None).unwrap();
    db.store_artifact("k", &b, "u2", None, None, None).unwrap();

    let latest = db.read_artifact("k", None, None, None).unwrap();
    assert_eq!(latest.get_str(&"body".into()), Some("B"));
    let history = db.read_artifact("k", Some("u1"), None, None).unwrap();
    assert_eq!(history.get_str(&"body".into()), Some("A"));
}

#[test]
fn state_and_label_filters_hold_for_every_result() {
    let (_dir, db) = open("yaml");
    let states = ["running", "completed", "running", "error"];
    for (i, state) in states.iter().enumerate() {
        let owner = if i % 2 == 0 { "ana" } else { "bob" };
        let uid = format!("r{i}");
        let run = Run::new("job").with_uid(&uid).with_state(*state).with_label("owner", owner);
        db.store_run(&run, &uid, None, 0).unwrap();
    }

    let selector = LabelSelector::parse("owner=ana").unwrap();
    let runs = db
        .list_runs(&RunQuery::new().state("running").labels(selector.clone()))
        .unwrap();
    assert_eq!(runs.len(), 2);
    for run in &runs {
        assert_eq!(run.state(), Some("running"));
        assert!(selector.matches(run.labels()));
    }
}

#[test]
fn bulk_deletion_needs_a_filter() {
    let (_dir, db) = open("yaml");
    db.store_run(&Run::new("x").with_uid("1"), "1", None, 0).unwrap();
    db.store_run(&Run::new("other").with_uid("2"), "2", None, 0).unwrap();

    assert!(matches!(
        db.del_runs(&RunDeletion::new()),
        Err(StoreError::InvalidFilter(_))
    ));
    assert_eq!(db.list_runs(&RunQuery::new()).unwrap().len(), 2);

    assert_eq!(db.del_runs(&RunDeletion::new().name("x")).unwrap(), 1);
    let left = db.list_runs(&RunQuery::new()).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].name(), Some("other"));
}

#[test]
fn iterations_are_hidden_by_default() {
    let (_dir, db) = open("yaml");
    for iter in 0..3 {
        let run = Run::new("sweep").with_uid("u1").with_iteration(iter);
        db.store_run(&run, "u1", None, iter).unwrap();
    }

    let top = db.list_runs(&RunQuery::new()).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].iteration(), 0);
    assert_eq!(
        db.list_runs(&RunQuery::new().include_iterations(true)).unwrap().len(),
        3
    );
}

#[test]
fn artifact_copies_and_latest_tree() {
    let (dir, db) = open("yaml");
    let model = Artifact::new("model").with_attr("size", 1024);
    db.store_artifact("model", &model, "run1", None, None, None).unwrap();

    assert!(dir.path().join("artifacts/default/latest/model.yaml").is_file());
    assert!(dir.path().join("artifacts/default/run1/model.yaml").is_file());

    let read = db.read_artifact("model", None, None, None).unwrap();
    assert_eq!(read.get_u64(&"size".into()), Some(1024));

    let all = db.list_artifacts(&ArtifactQuery::new().tag("*")).unwrap();
    assert!(all.iter().any(|a| a.tree() == Some("latest")));
}

#[test]
fn corrupt_files_are_skipped_and_counted() {
    let (dir, db) = open("yaml");
    db.store_run(&Run::new("ok").with_uid("ok"), "ok", None, 0).unwrap();
    std::fs::write(dir.path().join("runs/default/bad.yaml"), "key: [unclosed").unwrap();
    std::fs::write(dir.path().join("runs/default/empty.yaml"), "").unwrap();

    let runs = db.list_runs(&RunQuery::new()).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(db.skipped_files(), 2);
}

#[test]
fn unsupported_format_fails_on_use() {
    let (_dir, db) = open("xml");
    let err = db.store_run(&Run::new("x"), "x", None, 0).unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedFormat(ref f) if f.contains("xml")));
    assert!(matches!(
        db.list_runs(&RunQuery::new()),
        Err(StoreError::UnsupportedFormat(_))
    ));
}
