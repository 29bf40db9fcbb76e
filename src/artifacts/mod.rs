//! Data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `core`: Shared utilities (pager wrapper)
//! - `log`: Commit history traversal and per-file filtering
//! - `objects`: Object types (blob, tree, commit)

pub mod core;
pub mod log;
pub mod objects;
