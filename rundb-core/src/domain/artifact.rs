//! Artifact domain types

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{AttrPath, Document, Record};

pub mod fields {
    pub const KEY: &str = "key";
    pub const LABELS: &str = "labels";
    pub const UPDATED: &str = "updated";
    pub const TREE: &str = "tree";
}

/// Tag every artifact store also writes, pointing at the newest version
pub const LATEST_TAG: &str = "latest";

/// A produced output (model, plot, dataset reference)
///
/// Beyond `key`, `labels` and `updated` the payload is free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifact(Record);

impl Artifact {
    pub fn new(key: impl Into<String>) -> Self {
        let mut record = Record::new();
        record.set(&fields::KEY.into(), key.into());
        Self(record)
    }

    pub fn from_record(record: Record) -> Self {
        Self(record)
    }

    pub fn into_record(self) -> Record {
        self.0
    }

    pub fn with_label(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.set(&AttrPath::new(["labels", key]), value.into());
        self
    }

    pub fn with_updated(mut self, updated: impl Into<String>) -> Self {
        self.0.set(&fields::UPDATED.into(), updated.into());
        self
    }

    /// Set an arbitrary payload attribute
    pub fn with_attr(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.0.set(&path.into(), value);
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.0.get_str(&fields::KEY.into())
    }

    pub fn labels(&self) -> Option<&Map<String, Value>> {
        self.0.get_object(&fields::LABELS.into())
    }

    pub fn updated(&self) -> Option<&str> {
        self.0.get_str(&fields::UPDATED.into())
    }

    /// `Some("latest")` on listing results read from the latest tag directory
    pub fn tree(&self) -> Option<&str> {
        self.0.get_str(&fields::TREE.into())
    }
}

impl Deref for Artifact {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl DerefMut for Artifact {
    fn deref_mut(&mut self) -> &mut Record {
        &mut self.0
    }
}

impl From<Record> for Artifact {
    fn from(record: Record) -> Self {
        Artifact(record)
    }
}

impl Document for Artifact {
    fn to_record(&self) -> Record {
        self.0.clone()
    }

    fn set_attr(&mut self, path: &AttrPath, value: Value) {
        self.0.set(path, value);
    }
}

/// Artifacts returned by a listing, with the tag that was requested
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtifactList {
    pub tag: String,
    pub items: Vec<Artifact>,
}

impl ArtifactList {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.items.iter()
    }
}

impl IntoIterator for ArtifactList {
    type Item = Artifact;
    type IntoIter = std::vec::IntoIter<Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_accessors() {
        let artifact = Artifact::new("model")
            .with_label("framework", "sklearn")
            .with_attr("spec.target_path", "s3://bucket/model.pkl");

        assert_eq!(artifact.key(), Some("model"));
        assert_eq!(artifact.updated(), None);
        assert_eq!(artifact.tree(), None);
        assert_eq!(
            artifact.get_str(&"spec.target_path".into()),
            Some("s3://bucket/model.pkl")
        );
        assert!(artifact.labels().is_some_and(|l| l.contains_key("framework")));
    }
}
