//! Function domain types

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{AttrPath, Document, Record};

pub mod fields {
    pub const NAME: &str = "metadata.name";
    pub const TAG: &str = "metadata.tag";
    pub const LABELS: &str = "metadata.labels";
    pub const UPDATED: &str = "metadata.updated";
}

/// File stems longer than this are content hashes, not human tags
pub const MAX_TAG_LEN: usize = 20;

/// Tag derived from a function file stem
///
/// Functions are stored under `<tag>.<ext>`; a stem that is too long to be a
/// human-chosen tag is a hash and leaves the function untagged.
pub fn tag_from_stem(stem: &str) -> &str {
    if stem.len() > MAX_TAG_LEN { "" } else { stem }
}

/// A registered function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Function(Record);

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        let mut record = Record::new();
        record.set(&fields::NAME.into(), name.into());
        Self(record)
    }

    pub fn from_record(record: Record) -> Self {
        Self(record)
    }

    pub fn into_record(self) -> Record {
        self.0
    }

    pub fn with_label(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.set(&AttrPath::new(["metadata", "labels", key]), value.into());
        self
    }

    pub fn with_attr(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.0.set(&path.into(), value);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get_str(&fields::NAME.into())
    }

    pub fn tag(&self) -> Option<&str> {
        self.0.get_str(&fields::TAG.into())
    }

    pub fn labels(&self) -> Option<&Map<String, Value>> {
        self.0.get_object(&fields::LABELS.into())
    }

    pub fn updated(&self) -> Option<&str> {
        self.0.get_str(&fields::UPDATED.into())
    }
}

impl Deref for Function {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl DerefMut for Function {
    fn deref_mut(&mut self) -> &mut Record {
        &mut self.0
    }
}

impl From<Record> for Function {
    fn from(record: Record) -> Self {
        Function(record)
    }
}

impl Document for Function {
    fn to_record(&self) -> Record {
        self.0.clone()
    }

    fn set_attr(&mut self, path: &AttrPath, value: Value) {
        self.0.set(path, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_from_stem() {
        assert_eq!(tag_from_stem("latest"), "latest");
        assert_eq!(tag_from_stem("v1.2"), "v1.2");
        assert_eq!(tag_from_stem("a".repeat(20).as_str()).len(), 20);
        assert_eq!(tag_from_stem("3f2a9c0d1e4b5a6f7e8d9c0b1a2f3e4d"), "");
    }

    #[test]
    fn test_function_accessors() {
        let function = Function::new("trainer")
            .with_label("kind", "job")
            .with_attr("spec.image", "mlrun/ml-models");

        assert_eq!(function.name(), Some("trainer"));
        assert_eq!(function.tag(), None);
        assert_eq!(function.get_str(&"spec.image".into()), Some("mlrun/ml-models"));
        assert!(function.labels().is_some_and(|l| l.contains_key("kind")));
    }
}
