//! Label selectors
//!
//! Callers filter runs, artifacts and functions by label either with a
//! mapping (`{"owner": "ana"}`) or with a comma-separated condition string
//! (`"owner=ana,gpu"`). Both forms become a `LabelSelector`.

use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

/// A single label condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelCondition {
    /// `key=value`
    Equals(String, String),
    /// `key!=value`
    NotEquals(String, String),
    /// `key~=value`, the label contains `value`
    Contains(String, String),
    /// bare `key`, the label is present
    Present(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal label condition - {0}")]
pub struct LabelParseError(pub String);

impl LabelCondition {
    pub fn parse(text: &str) -> Result<Self, LabelParseError> {
        let text = text.trim();
        if text.contains("~=") {
            let (key, value) = split_condition(text, "~=")?;
            Ok(LabelCondition::Contains(key, value))
        } else if text.contains("!=") {
            let (key, value) = split_condition(text, "!=")?;
            Ok(LabelCondition::NotEquals(key, value))
        } else if text.contains('=') {
            let (key, value) = split_condition(text, "=")?;
            Ok(LabelCondition::Equals(key, value))
        } else if text.is_empty() {
            Err(LabelParseError(text.to_string()))
        } else {
            Ok(LabelCondition::Present(text.to_string()))
        }
    }

    /// Evaluate against a label mapping. A missing label reads as `""`.
    pub fn matches(&self, labels: &Map<String, Value>) -> bool {
        match self {
            LabelCondition::Equals(key, value) => label_text(labels, key) == *value,
            LabelCondition::NotEquals(key, value) => label_text(labels, key) != *value,
            LabelCondition::Contains(key, value) => {
                label_text(labels, key).contains(value.as_str())
            }
            LabelCondition::Present(key) => labels.contains_key(key),
        }
    }
}

fn split_condition(text: &str, verb: &str) -> Result<(String, String), LabelParseError> {
    let items: Vec<&str> = text.split(verb).collect();
    match items.as_slice() {
        [key, value] if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(LabelParseError(text.to_string())),
    }
}

fn label_text(labels: &Map<String, Value>, key: &str) -> String {
    match labels.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// All conditions must hold (logical AND). An empty selector matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector(Vec<LabelCondition>);

impl LabelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list of conditions. Blank items are ignored.
    pub fn parse(text: &str) -> Result<Self, LabelParseError> {
        text.split(',')
            .filter(|item| !item.trim().is_empty())
            .map(LabelCondition::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Add a condition
    pub fn with(mut self, condition: LabelCondition) -> Self {
        self.0.push(condition);
        self
    }

    pub fn conditions(&self) -> &[LabelCondition] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Match a record's label mapping. A record without labels only
    /// satisfies conditions that accept an empty label.
    pub fn matches(&self, labels: Option<&Map<String, Value>>) -> bool {
        if self.0.is_empty() {
            return true;
        }
        let empty = Map::new();
        let labels = labels.unwrap_or(&empty);
        self.0.iter().all(|condition| condition.matches(labels))
    }
}

impl FromStr for LabelSelector {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabelSelector::parse(s)
    }
}

/// Build an equality selector from a label mapping
impl<K, V> FromIterator<(K, V)> for LabelSelector
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| LabelCondition::Equals(k.into(), v.into()))
                .collect(),
        )
    }
}
