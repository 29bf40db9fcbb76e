//! Commit history traversal
//!
//! - `rev_list`: iteration over the parent chain from a starting commit
//! - `file_history`: per-file filtering of the chain, emitting only the
//!   commits where a file's blob digest changed

pub mod file_history;
pub mod rev_list;
