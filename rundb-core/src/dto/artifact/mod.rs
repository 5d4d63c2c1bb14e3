//! Artifact queries

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::filter::LabelSelector;

/// Filter for listing artifacts
#[derive(Debug, Clone, Default)]
pub struct ArtifactQuery {
    /// Substring of the artifact key
    pub name: Option<String>,
    pub project: Option<String>,
    /// Tag directory to list, `"*"` for every tag. Defaults to `latest`.
    pub tag: Option<String>,
    pub labels: LabelSelector,
    /// Inclusive lower bound on `updated`
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `updated`
    pub until: Option<DateTime<Utc>>,
}

impl ArtifactQuery {
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

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn labels(mut self, labels: LabelSelector) -> Self {
        self.labels = labels;
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Naive bounds are taken as UTC
    pub fn since_naive(self, since: NaiveDateTime) -> Self {
        self.since(since.and_utc())
    }

    pub fn until_naive(self, until: NaiveDateTime) -> Self {
        self.until(until.and_utc())
    }
}

/// Filter for bulk artifact deletion. The name must equal the key exactly.
#[derive(Debug, Clone, Default)]
pub struct ArtifactDeletion {
    pub name: Option<String>,
    pub project: Option<String>,
    pub tag: Option<String>,
    pub labels: LabelSelector,
}

impl ArtifactDeletion {
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

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn labels(mut self, labels: LabelSelector) -> Self {
        self.labels = labels;
        self
    }
}
