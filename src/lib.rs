//! A content-addressable page store with git-style objects
//!
//! File content is stored as immutable, SHA-1-addressed blob objects; named
//! blob mappings are grouped into flat tree objects; snapshots are chained
//! into commit objects linked by parent references. A single branch ref,
//! reached through the HEAD indirection, points at the latest commit.
//!
//! The crate is organized into:
//!
//! - `areas`: the storage areas of a repository (object database, refs,
//!   workspace, and the repository wiring itself)
//! - `artifacts`: object types, serialization, and history traversal
//! - `commands`: plumbing and porcelain command implementations
//! - `errors`: typed error kinds surfaced by the storage layers

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
