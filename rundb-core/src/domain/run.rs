//! Run domain types

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::types::{AttrPath, Document, Record};

/// Attribute paths of the run fields the store reads
pub mod fields {
    pub const NAME: &str = "metadata.name";
    pub const UID: &str = "metadata.uid";
    pub const PROJECT: &str = "metadata.project";
    pub const LABELS: &str = "metadata.labels";
    pub const ITERATION: &str = "metadata.iteration";
    pub const STATE: &str = "status.state";
    pub const START_TIME: &str = "status.start_time";
}

/// One execution of a job
///
/// A run is stored as a free-form record; the accessors below cover the
/// fields the store filters and sorts on. Iteration 0 is the main run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Run(Record);

impl Run {
    /// New run with a random uid in `created` state
    pub fn new(name: impl Into<String>) -> Self {
        let mut record = Record::new();
        record.set(&fields::NAME.into(), name.into());
        record.set(&fields::UID.into(), Uuid::new_v4().simple().to_string());
        record.set(&fields::ITERATION.into(), 0);
        record.set(&fields::LABELS.into(), Value::Object(Map::new()));
        record.set(&fields::STATE.into(), "created");
        Self(record)
    }

    pub fn from_record(record: Record) -> Self {
        Self(record)
    }

    pub fn into_record(self) -> Record {
        self.0
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.0.set(&fields::UID.into(), uid.into());
        self
    }

    pub fn with_iteration(mut self, iteration: u64) -> Self {
        self.0.set(&fields::ITERATION.into(), iteration);
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.0.set(&fields::STATE.into(), state.into());
        self
    }

    pub fn with_start_time(mut self, start_time: chrono::DateTime<chrono::Utc>) -> Self {
        self.0.set(&fields::START_TIME.into(), start_time.to_rfc3339());
        self
    }

    pub fn with_label(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.set(&AttrPath::new(["metadata", "labels", key]), value.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get_str(&fields::NAME.into())
    }

    pub fn uid(&self) -> Option<&str> {
        self.0.get_str(&fields::UID.into())
    }

    /// Missing iteration reads as the main run
    pub fn iteration(&self) -> u64 {
        self.0.get_u64(&fields::ITERATION.into()).unwrap_or(0)
    }

    pub fn labels(&self) -> Option<&Map<String, Value>> {
        self.0.get_object(&fields::LABELS.into())
    }

    pub fn state(&self) -> Option<&str> {
        self.0.get_str(&fields::STATE.into())
    }

    pub fn start_time(&self) -> Option<&str> {
        self.0.get_str(&fields::START_TIME.into())
    }
}

impl Deref for Run {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl DerefMut for Run {
    fn deref_mut(&mut self) -> &mut Record {
        &mut self.0
    }
}

impl From<Record> for Run {
    fn from(record: Record) -> Self {
        Run(record)
    }
}

impl Document for Run {
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
    fn test_new_run_defaults() {
        let run = Run::new("train");
        assert_eq!(run.name(), Some("train"));
        assert_eq!(run.state(), Some("created"));
        assert_eq!(run.iteration(), 0);
        assert_eq!(run.uid().map(str::len), Some(32));
        assert!(run.labels().is_some_and(Map::is_empty));
    }

    #[test]
    fn test_builder_fields() {
        let run = Run::new("train")
            .with_uid("abc")
            .with_iteration(2)
            .with_state("running")
            .with_label("owner", "ana");

        assert_eq!(run.uid(), Some("abc"));
        assert_eq!(run.iteration(), 2);
        assert_eq!(run.state(), Some("running"));
        assert_eq!(
            run.labels().and_then(|l| l.get("owner")),
            Some(&Value::from("ana"))
        );
        assert_eq!(run.start_time(), None);
    }
}
