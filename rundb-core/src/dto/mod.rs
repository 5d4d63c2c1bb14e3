//! Query and mutation requests
//!
//! This module contains the filter and update structures callers hand to the
//! store's list, bulk-delete and update operations. They hold plain data; the
//! store turns them into scan predicates.

pub mod artifact;
pub mod function;
pub mod run;

/// Tag wildcard for listing and deletion. Never valid for storage.
pub const ANY_TAG: &str = "*";
