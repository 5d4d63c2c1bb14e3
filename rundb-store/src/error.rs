//! Error types for the run database

use std::path::PathBuf;

use rundb_core::LabelParseError;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur when using the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Exact-coordinate read of a run or artifact that does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Bulk deletion without any discriminating filter
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// The store was opened with a format it cannot encode
    #[error("unsupported format - {0}")]
    UnsupportedFormat(String),

    /// Deleting a specific file that is not there
    #[error("run file is not found or valid ({})", .0.display())]
    DeleteTargetMissing(PathBuf),

    /// Filesystem failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(String),

    #[error("failed to decode record: {0}")]
    Decode(String),

    #[error(transparent)]
    InvalidLabel(#[from] LabelParseError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
