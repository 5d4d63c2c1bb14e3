//! Path resolution
//!
//! Maps logical coordinates (table, project, key, tag) to files under the
//! store root. There is no index: every path is a pure function of its
//! coordinates, so the scans in `query` find exactly what was written here.

use std::fmt;
use std::path::{Path, PathBuf};

use rundb_core::domain::artifact::LATEST_TAG;
use rundb_core::dto::ANY_TAG;

/// Top-level directories of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Runs,
    Artifacts,
    Functions,
    Schedules,
}

impl Table {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Table::Runs => "runs",
            Table::Artifacts => "artifacts",
            Table::Functions => "functions",
            Table::Schedules => "schedules",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Resolve an optional tag, defaulting to `latest`
pub fn tag_or_latest(tag: Option<&str>) -> &str {
    match tag {
        Some(tag) if !tag.is_empty() => tag,
        _ => LATEST_TAG,
    }
}

/// Run file stem: `uid` for the main run, `uid-iter` for sub-runs
pub fn run_stem(uid: &str, iter: u64) -> String {
    if iter == 0 {
        uid.to_string()
    } else {
        format!("{uid}-{iter}")
    }
}

/// Artifact key as stored: `iter-key` for iterations other than 0
pub fn artifact_stem(key: &str, iter: Option<u64>) -> String {
    match iter {
        Some(iter) if iter > 0 => format!("{iter}-{key}"),
        _ => key.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    default_project: String,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>, default_project: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_project: default_project.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn default_project(&self) -> &str {
        &self.default_project
    }

    /// The given project, or the configured default when missing or empty
    pub fn project<'a>(&'a self, project: Option<&'a str>) -> &'a str {
        match project {
            Some(project) if !project.is_empty() => project,
            _ => &self.default_project,
        }
    }

    /// `root/table/project`
    pub fn table_dir(&self, table: Table, project: Option<&str>) -> PathBuf {
        self.root.join(table.dir_name()).join(self.project(project))
    }

    /// `root/table/project/[tag/]key`
    ///
    /// The wildcard tag resolves to no tag segment, so a scan rooted at the
    /// result reaches every tag directory.
    pub fn filepath(
        &self,
        table: Table,
        project: Option<&str>,
        key: &str,
        tag: Option<&str>,
    ) -> PathBuf {
        let mut path = self.table_dir(table, project);
        match tag {
            Some(tag) if !tag.is_empty() && tag != ANY_TAG => path.push(tag),
            _ => {}
        }
        if !key.is_empty() {
            path.push(key);
        }
        path
    }

    /// `runs/<project>/<uid>[-<iter>].<ext>`
    pub fn run_file(&self, project: Option<&str>, uid: &str, iter: u64, ext: &str) -> PathBuf {
        with_extension(self.filepath(Table::Runs, project, &run_stem(uid, iter), None), ext)
    }

    /// `runs/<project>/<uid>.log`
    pub fn log_file(&self, project: Option<&str>, uid: &str) -> PathBuf {
        with_extension(self.filepath(Table::Runs, project, uid, None), "log")
    }

    /// `artifacts/<project>/<tag>/<key>.<ext>`
    pub fn artifact_file(&self, project: Option<&str>, key: &str, tag: &str, ext: &str) -> PathBuf {
        with_extension(self.filepath(Table::Artifacts, project, key, Some(tag)), ext)
    }

    /// `functions/<project>/<name>/<tag>.<ext>`
    pub fn function_file(
        &self,
        project: Option<&str>,
        name: &str,
        tag: Option<&str>,
        ext: &str,
    ) -> PathBuf {
        let path = self
            .table_dir(Table::Functions, project)
            .join(name)
            .join(tag_or_latest(tag));
        with_extension(path, ext)
    }

    pub fn schedules_dir(&self) -> PathBuf {
        self.root.join(Table::Schedules.dir_name())
    }

    /// `schedules/<id>.<ext>`
    pub fn schedule_file(&self, id: u64, ext: &str) -> PathBuf {
        self.schedules_dir().join(format!("{id}.{ext}"))
    }

    /// `root/runs`, whose subdirectories are the projects
    pub fn runs_root(&self) -> PathBuf {
        self.root.join(Table::Runs.dir_name())
    }
}

/// Append `.ext` to the last component. Unlike `Path::with_extension` this
/// keeps dots already in the name (`v1.2` stays `v1.2.yaml`).
fn with_extension(path: PathBuf, ext: &str) -> PathBuf {
    let mut os = path.into_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new("/data", "default")
    }

    #[test]
    fn test_filepath_layout() {
        let r = resolver();
        assert_eq!(
            r.filepath(Table::Artifacts, Some("p1"), "model", Some("v2")),
            PathBuf::from("/data/artifacts/p1/v2/model")
        );
        assert_eq!(
            r.filepath(Table::Artifacts, None, "model", Some("*")),
            PathBuf::from("/data/artifacts/default/model")
        );
        assert_eq!(
            r.filepath(Table::Artifacts, Some(""), "", Some("*")),
            PathBuf::from("/data/artifacts/default")
        );
    }

    #[test]
    fn test_run_files() {
        let r = resolver();
        assert_eq!(
            r.run_file(None, "abc", 0, "yaml"),
            PathBuf::from("/data/runs/default/abc.yaml")
        );
        assert_eq!(
            r.run_file(Some("p"), "abc", 3, "json"),
            PathBuf::from("/data/runs/p/abc-3.json")
        );
        assert_eq!(r.log_file(None, "abc"), PathBuf::from("/data/runs/default/abc.log"));
    }

    #[test]
    fn test_artifact_and_function_files() {
        let r = resolver();
        assert_eq!(
            r.artifact_file(None, &artifact_stem("model", Some(2)), "latest", "yaml"),
            PathBuf::from("/data/artifacts/default/latest/2-model.yaml")
        );
        assert_eq!(
            r.function_file(Some("p"), "trainer", None, "yaml"),
            PathBuf::from("/data/functions/p/trainer/latest.yaml")
        );
        assert_eq!(
            r.function_file(Some("p"), "trainer", Some("v1.2"), "yaml"),
            PathBuf::from("/data/functions/p/trainer/v1.2.yaml")
        );
    }

    #[test]
    fn test_schedule_files() {
        let r = resolver();
        assert_eq!(r.schedule_file(4, "json"), PathBuf::from("/data/schedules/4.json"));
        assert_eq!(r.runs_root(), PathBuf::from("/data/runs"));
    }

    #[test]
    fn test_tag_defaults() {
        assert_eq!(tag_or_latest(None), "latest");
        assert_eq!(tag_or_latest(Some("")), "latest");
        assert_eq!(tag_or_latest(Some("v1")), "v1");
        assert_eq!(artifact_stem("k", Some(0)), "k");
        assert_eq!(artifact_stem("k", None), "k");
    }
}
