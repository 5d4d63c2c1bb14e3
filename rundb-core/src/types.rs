//! Shared record types for rundb
//!
//! This module contains:
//! - `Record`: the mapping-typed tree every entity is persisted as
//! - `AttrPath`: dotted attribute paths into a record (`status.state`)
//! - `Format`: the two serialization formats a store can be opened with
//! - `Document`: anything the store can encode
//!
//! Note: Encoding and file layout live in rundb-store, this crate does no I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Attribute Paths
// =============================================================================

/// Dotted path into a nested record, e.g. `metadata.labels`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrPath(Vec<String>);

impl AttrPath {
    /// Build a path from individual segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a dotted path. Empty segments are ignored.
    pub fn parse(path: &str) -> Self {
        Self::new(path.split('.').filter(|s| !s.is_empty()))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for AttrPath {
    fn from(path: &str) -> Self {
        AttrPath::parse(path)
    }
}

impl From<String> for AttrPath {
    fn from(path: String) -> Self {
        AttrPath::parse(&path)
    }
}

impl fmt::Display for AttrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

// =============================================================================
// Record
// =============================================================================

/// A persisted record: a JSON-like tree whose root is normally a mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Default for Record {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl Record {
    /// Create an empty mapping record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// True for records carrying no data: null, `false`, zero, or an empty
    /// string, sequence or mapping. Scans drop such records.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Object(m) => m.is_empty(),
        }
    }

    /// Look up the value at `path`
    pub fn get(&self, path: &AttrPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.0, |node, segment| node.as_object()?.get(segment))
    }

    pub fn get_str(&self, path: &AttrPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_u64(&self, path: &AttrPath) -> Option<u64> {
        self.get(path).and_then(Value::as_u64)
    }

    pub fn get_object(&self, path: &AttrPath) -> Option<&Map<String, Value>> {
        self.get(path).and_then(Value::as_object)
    }

    pub fn contains(&self, path: &AttrPath) -> bool {
        self.get(path).is_some()
    }

    /// Set the value at `path`, creating intermediate mappings as needed.
    ///
    /// Any non-mapping value met on the way is replaced by a mapping.
    pub fn set(&mut self, path: &AttrPath, value: impl Into<Value>) {
        let mut node = &mut self.0;
        for segment in path.segments() {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let Value::Object(map) = node else {
                return;
            };
            node = map.entry(segment.clone()).or_insert(Value::Null);
        }
        *node = value.into();
    }

    /// Remove and return the value at `path`
    pub fn remove(&mut self, path: &AttrPath) -> Option<Value> {
        let (last, parents) = path.segments().split_last()?;
        let mut node = &mut self.0;
        for segment in parents {
            node = node.as_object_mut()?.get_mut(segment)?;
        }
        node.as_object_mut()?.remove(last)
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record(value)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.0
    }
}

// =============================================================================
// Formats and Documents
// =============================================================================

/// Serialization format of a store's files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    /// Accepts the name with or without a leading dot (`yaml`, `.json`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            _ => Err(s.to_string()),
        }
    }
}

/// Something the store can persist.
///
/// The store prefers `encode_with` when it returns `Some`, letting structured
/// domain objects control their own representation. Otherwise the generic
/// codec for the store's format encodes `to_record()`.
///
/// Attributes the store stamps on write (`updated`, `metadata.tag`) go
/// through `set_attr` so a custom serializer sees them.
pub trait Document {
    fn to_record(&self) -> Record;

    fn set_attr(&mut self, path: &AttrPath, value: Value);

    fn encode_with(&self, _format: Format) -> Option<String> {
        None
    }
}

impl Document for Record {
    fn to_record(&self) -> Record {
        self.clone()
    }

    fn set_attr(&mut self, path: &AttrPath, value: Value) {
        self.set(path, value);
    }
}

impl Document for Value {
    fn to_record(&self) -> Record {
        Record(self.clone())
    }

    fn set_attr(&mut self, path: &AttrPath, value: Value) {
        let mut record = Record(std::mem::take(self));
        record.set(path, value);
        *self = record.0;
    }
}
