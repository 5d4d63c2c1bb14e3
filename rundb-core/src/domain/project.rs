//! Project domain types

use serde::{Deserialize, Serialize};

/// A namespace grouping runs, artifacts and functions
///
/// Projects are implicit: every directory under the runs table is one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
