//! Schedule domain types

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{AttrPath, Document, Record};

/// A persisted recurring-job definition
///
/// The store treats schedules as opaque; the id is the file name it assigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(Record);

impl Schedule {
    pub fn from_record(record: Record) -> Self {
        Self(record)
    }

    pub fn into_record(self) -> Record {
        self.0
    }
}

impl Deref for Schedule {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl From<Record> for Schedule {
    fn from(record: Record) -> Self {
        Schedule(record)
    }
}

impl Document for Schedule {
    fn to_record(&self) -> Record {
        self.0.clone()
    }

    fn set_attr(&mut self, path: &AttrPath, value: Value) {
        self.0.set(path, value);
    }
}
