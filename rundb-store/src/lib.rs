//! Rundb Store
//!
//! File-backed run database.
//!
//! This crate contains:
//! - Path resolution: logical coordinates to files under the store root
//! - Codec: YAML or JSON encoding, selected once per store
//! - Query engine: lazy directory scans filtered by predicates
//! - Repositories: store/read/update/list/delete operations on `FileRunDb`

pub mod codec;
pub mod config;
pub mod db;
pub mod error;
pub mod paths;
pub mod query;
pub mod repository;

pub use codec::{Codec, FormatSelection};
pub use config::StoreConfig;
pub use db::FileRunDb;
pub use error::{Result, StoreError};
pub use repository::DEFAULT_LOG_CHUNK;
pub use rundb_core::Format;
