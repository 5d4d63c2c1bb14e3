//! Run queries and updates

use serde_json::Value;

use crate::filter::LabelSelector;
use crate::types::AttrPath;

/// Default cap on the number of runs a listing returns
pub const DEFAULT_LAST: usize = 1000;

/// Filter for listing runs
#[derive(Debug, Clone)]
pub struct RunQuery {
    /// Substring of `metadata.name`
    pub name: Option<String>,
    pub uid: Option<String>,
    pub project: Option<String>,
    pub labels: LabelSelector,
    pub state: Option<String>,
    /// Sort by start time, most recent first
    pub sort: bool,
    /// Keep only the most recent `last` runs. Zero keeps everything.
    pub last: usize,
    /// Include runs with iteration > 0
    pub include_iterations: bool,
}

impl Default for RunQuery {
    fn default() -> Self {
        Self {
            name: None,
            uid: None,
            project: None,
            labels: LabelSelector::default(),
            state: None,
            sort: true,
            last: DEFAULT_LAST,
            include_iterations: false,
        }
    }
}

impl RunQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn labels(mut self, labels: LabelSelector) -> Self {
        self.labels = labels;
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn last(mut self, last: usize) -> Self {
        self.last = last;
        self
    }

    pub fn include_iterations(mut self, include: bool) -> Self {
        self.include_iterations = include;
        self
    }
}

/// Filter for bulk run deletion
///
/// At least one of name, state, labels or age must be set, otherwise the
/// store refuses to delete.
#[derive(Debug, Clone, Default)]
pub struct RunDeletion {
    pub name: Option<String>,
    pub project: Option<String>,
    pub labels: LabelSelector,
    pub state: Option<String>,
    /// Only runs that started more than this many days ago
    pub days_ago: Option<u32>,
}

impl RunDeletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn labels(mut self, labels: LabelSelector) -> Self {
        self.labels = labels;
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn days_ago(mut self, days: u32) -> Self {
        self.days_ago = Some(days);
        self
    }

    /// True when some discriminating filter is present
    pub fn is_bounded(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
            || self.state.as_deref().is_some_and(|s| !s.is_empty())
            || self.days_ago.is_some_and(|d| d > 0)
            || !self.labels.is_empty()
    }
}

/// Attribute updates applied by `update_run`, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunUpdate(Vec<(AttrPath, Value)>);

impl RunUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, path: impl Into<AttrPath>, value: impl Into<Value>) -> Self {
        self.0.push((path.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(AttrPath, Value)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for RunUpdate
where
    K: Into<AttrPath>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
