//! Query engine
//!
//! A listing is a directory scan: walk the files a `Mask` selects under a
//! resolved directory, decode each one and keep the records every predicate
//! accepts. Scans are lazy and restartable; nothing is cached between calls.
//!
//! Files that cannot be read or decoded are skipped rather than failing the
//! whole listing. Skips are counted in `ScanStats`.

pub mod predicate;

pub use predicate::Predicates;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rundb_core::Record;
use rundb_core::dto::ANY_TAG;
use walkdir::WalkDir;

use crate::codec::Codec;

/// Notebook checkpoint directories are never part of the store
const CHECKPOINT_DIR: &str = ".ipynb_checkpoints";

/// Which files under the scan root are candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mask {
    /// `*.<ext>`: files directly under the root
    Children,
    /// `**/*.<ext>`: files at any depth
    Recursive,
    /// `**/*<name>*.<ext>`: files at any depth whose stem contains `name`
    RecursiveContaining(String),
}

impl Mask {
    /// Mask for an artifact scan. The wildcard tag narrows by name in the
    /// file pattern itself, any other tag scans its whole directory.
    pub fn for_tag(tag: &str, name: Option<&str>) -> Self {
        match name {
            Some(name) if tag == ANY_TAG && !name.is_empty() => {
                Mask::RecursiveContaining(name.to_string())
            }
            _ => Mask::Recursive,
        }
    }

    fn max_depth(&self) -> Option<usize> {
        match self {
            Mask::Children => Some(1),
            Mask::Recursive | Mask::RecursiveContaining(_) => None,
        }
    }

    fn matches(&self, file_name: &str, ext: &str) -> bool {
        let Some(stem) = file_name
            .strip_suffix(ext)
            .and_then(|rest| rest.strip_suffix('.'))
        else {
            return false;
        };
        match self {
            Mask::Children | Mask::Recursive => true,
            Mask::RecursiveContaining(name) => stem.contains(name.as_str()),
        }
    }
}

/// Counters shared by every scan of one store
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    skipped: Arc<AtomicU64>,
}

impl ScanStats {
    /// Files skipped because they were unreadable, empty or undecodable
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    fn record_skip(&self, path: &Path, reason: &str) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Skipping {}: {}", path.display(), reason);
    }
}

/// Decoded records paired with the file they came from
pub type Records = Box<dyn Iterator<Item = (Record, PathBuf)>>;

/// A lazy, restartable scan yielding `(record, path)` pairs
#[derive(Clone)]
pub struct Scan {
    root: PathBuf,
    mask: Mask,
    codec: &'static dyn Codec,
    stats: ScanStats,
}

impl Scan {
    pub fn new(
        root: impl Into<PathBuf>,
        mask: Mask,
        codec: &'static dyn Codec,
        stats: ScanStats,
    ) -> Self {
        Self {
            root: root.into(),
            mask,
            codec,
            stats,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory. Each call starts a fresh walk.
    ///
    /// A missing root yields nothing. Files come in file-name order.
    pub fn iter(&self) -> Records {
        walk(self.root.clone(), self.mask.clone(), self.codec, self.stats.clone())
    }

    /// Records accepted by every predicate
    pub fn matching<'a>(
        &self,
        predicates: &'a Predicates,
    ) -> impl Iterator<Item = (Record, PathBuf)> + 'a {
        self.iter().filter(move |(record, _)| predicates.matches(record))
    }
}

impl IntoIterator for Scan {
    type Item = (Record, PathBuf);
    type IntoIter = Records;

    fn into_iter(self) -> Records {
        walk(self.root, self.mask, self.codec, self.stats)
    }
}

impl IntoIterator for &Scan {
    type Item = (Record, PathBuf);
    type IntoIter = Records;

    fn into_iter(self) -> Records {
        self.iter()
    }
}

fn walk(root: PathBuf, mask: Mask, codec: &'static dyn Codec, stats: ScanStats) -> Records {
    // A table that was never written to has no directory yet
    if !root.is_dir() {
        return Box::new(std::iter::empty());
    }

    let ext = codec.format().extension();
    let mut walker = WalkDir::new(&root).min_depth(1).sort_by_file_name();
    if let Some(depth) = mask.max_depth() {
        walker = walker.max_depth(depth);
    }

    let walk_stats = stats.clone();
    let files = walker
        .into_iter()
        .filter_entry(|entry| entry.file_name() != CHECKPOINT_DIR)
        .filter_map(move |entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                walk_stats.record_skip(err.path().unwrap_or(&root), &err.to_string());
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(move |entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| mask.matches(name, ext))
        })
        .filter_map(move |entry| {
            let path = entry.into_path();
            load(&path, codec, &stats).map(|record| (record, path))
        });

    Box::new(files)
}

fn load(path: &Path, codec: &dyn Codec, stats: &ScanStats) -> Option<Record> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            stats.record_skip(path, "unreadable");
            return None;
        }
    };

    if text.trim().is_empty() {
        stats.record_skip(path, "empty file");
        return None;
    }

    match codec.decode(&text) {
        Ok(record) if record.is_empty() => {
            stats.record_skip(path, "empty record");
            None
        }
        Ok(record) => Some(record),
        Err(e) => {
            stats.record_skip(path, &e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn names(scan: &Scan) -> Vec<String> {
        scan.iter()
            .map(|(record, _)| record.get_str(&"key".into()).unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_mask_matching() {
        assert!(Mask::Recursive.matches("model.json", "json"));
        assert!(!Mask::Recursive.matches("model.yaml", "json"));
        assert!(!Mask::Recursive.matches("modeljson", "json"));
        assert!(Mask::RecursiveContaining("ode".into()).matches("model.json", "json"));
        assert!(!Mask::RecursiveContaining("data".into()).matches("model.json", "json"));
    }

    #[test]
    fn test_mask_for_tag() {
        assert_eq!(Mask::for_tag("*", Some("mod")), Mask::RecursiveContaining("mod".into()));
        assert_eq!(Mask::for_tag("*", None), Mask::Recursive);
        assert_eq!(Mask::for_tag("latest", Some("mod")), Mask::Recursive);
    }

    #[test]
    fn test_children_vs_recursive() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", r#"{"key": "a"}"#);
        write(dir.path(), "sub/b.json", r#"{"key": "b"}"#);

        let stats = ScanStats::default();
        let children = Scan::new(dir.path(), Mask::Children, &JsonCodec, stats.clone());
        assert_eq!(names(&children), vec!["a"]);

        let all = Scan::new(dir.path(), Mask::Recursive, &JsonCodec, stats);
        assert_eq!(names(&all), vec!["a", "b"]);
    }

    #[test]
    fn test_skips_are_counted() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.json", r#"{"key": "good"}"#);
        write(dir.path(), "empty.json", "");
        write(dir.path(), "null.json", "null");
        write(dir.path(), "broken.json", "{oops");
        write(dir.path(), ".ipynb_checkpoints/ckpt.json", r#"{"key": "ckpt"}"#);
        write(dir.path(), "other.txt", "ignored");

        let stats = ScanStats::default();
        let scan = Scan::new(dir.path(), Mask::Recursive, &JsonCodec, stats.clone());
        assert_eq!(names(&scan), vec!["good"]);
        assert_eq!(stats.skipped(), 3);
    }

    #[test]
    fn test_scan_is_restartable() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", r#"{"key": "a"}"#);

        let scan = Scan::new(dir.path(), Mask::Children, &JsonCodec, ScanStats::default());
        assert_eq!(scan.iter().count(), 1);

        write(dir.path(), "b.json", r#"{"key": "b"}"#);
        assert_eq!(scan.iter().count(), 2);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let stats = ScanStats::default();
        let scan = Scan::new(dir.path().join("nope"), Mask::Recursive, &JsonCodec, stats.clone());
        assert_eq!(scan.iter().count(), 0);
        assert_eq!(stats.skipped(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_counted() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.json", r#"{"key": "good"}"#);
        write(dir.path(), "locked/hidden.json", r#"{"key": "hidden"}"#);
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through the mode bits
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let stats = ScanStats::default();
        let scan = Scan::new(dir.path(), Mask::Recursive, &JsonCodec, stats.clone());
        let found = names(&scan);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(found, vec!["good"]);
        assert_eq!(stats.skipped(), 1);
    }
}
