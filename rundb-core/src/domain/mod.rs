//! Core domain types
//!
//! This module contains the entities the run database persists. Every entity
//! wraps a `Record` and adds typed accessors for the fields the store filters,
//! sorts or stamps. These types are shared between the store (persistence)
//! and the CLI (presentation).

pub mod artifact;
pub mod function;
pub mod project;
pub mod run;
pub mod schedule;
