//! Function queries

use crate::filter::LabelSelector;

/// Filter for listing functions
#[derive(Debug, Clone, Default)]
pub struct FunctionQuery {
    /// Restrict the scan to one function's directory
    pub name: Option<String>,
    pub project: Option<String>,
    /// Keep only functions whose derived tag equals this. `"*"` keeps all.
    pub tag: Option<String>,
    pub labels: LabelSelector,
}

impl FunctionQuery {
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
