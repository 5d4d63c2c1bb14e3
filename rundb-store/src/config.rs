//! Store configuration
//!
//! Defines where a store keeps its files, which format it writes and which
//! project coordinates default to.

use std::path::PathBuf;

/// Default serialization format name
pub const DEFAULT_FORMAT: &str = "yaml";

/// Project used when a call does not name one
pub const DEFAULT_PROJECT: &str = "default";

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory of the store
    pub dirpath: PathBuf,

    /// Format name (`yaml` or `json`, with or without a leading dot).
    /// An unknown name is accepted here and fails on first use.
    pub format: String,

    /// Project substituted for missing project coordinates
    pub default_project: String,
}

impl StoreConfig {
    /// Creates a new configuration with defaults
    pub fn new(dirpath: impl Into<PathBuf>) -> Self {
        Self {
            dirpath: dirpath.into(),
            format: DEFAULT_FORMAT.to_string(),
            default_project: DEFAULT_PROJECT.to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - RUNDB_DIRPATH (required)
    /// - RUNDB_FORMAT (optional, default: yaml)
    /// - RUNDB_DEFAULT_PROJECT (optional, default: default)
    pub fn from_env() -> anyhow::Result<Self> {
        let dirpath = std::env::var("RUNDB_DIRPATH")
            .map_err(|_| anyhow::anyhow!("RUNDB_DIRPATH environment variable not set"))?;

        let format = std::env::var("RUNDB_FORMAT").unwrap_or_else(|_| DEFAULT_FORMAT.to_string());

        let default_project = std::env::var("RUNDB_DEFAULT_PROJECT")
            .unwrap_or_else(|_| DEFAULT_PROJECT.to_string());

        Ok(Self {
            dirpath: PathBuf::from(dirpath),
            format,
            default_project,
        })
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_default_project(mut self, project: impl Into<String>) -> Self {
        self.default_project = project.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.dirpath.as_os_str().is_empty() {
            anyhow::bail!("dirpath cannot be empty");
        }

        if self.default_project.is_empty() {
            anyhow::bail!("default_project cannot be empty");
        }

        if self.default_project.contains(['/', '\\']) {
            anyhow::bail!("default_project must be a single path component");
        }

        Ok(())
    }
}
