//! rundb Core
//!
//! Core types and abstractions for the rundb run-tracking store.
//!
//! This crate contains:
//! - Shared types: `Record`, `AttrPath`, `Format`, `Document`
//! - Domain types: runs, artifacts, functions, schedules, projects
//! - DTOs: query, deletion and update requests
//! - Label selectors used by every listing

pub mod domain;
pub mod dto;
pub mod filter;
pub mod types;

pub use filter::{LabelCondition, LabelParseError, LabelSelector};
pub use types::{AttrPath, Document, Format, Record};
