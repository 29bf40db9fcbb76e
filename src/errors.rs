//! Typed error kinds for the storage layers
//!
//! Fallible paths keep `anyhow::Result` signatures for context chaining, but
//! the failures a caller may want to react to are raised as variants of
//! [`Error`] so they stay recoverable by downcast:
//!
//! - `MissingHead`: the HEAD pointer file is absent — the repository is not
//!   usable at all, as opposed to merely empty
//! - `EmptyRepository`: the branch ref has no target yet
//! - `ObjectNotFound`: a digest has no backing object file
//! - `MalformedObject`: decompression or structural decoding failed
//! - `FileNotFoundInCommit`: a filename is absent from a resolved tree
//! - `RefConflict`: the branch ref moved between resolving the parent and
//!   advancing the ref

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// HEAD pointer file is missing; the repository is unusable.
    #[error("HEAD not found at {path}: not a repository")]
    MissingHead { path: PathBuf },

    /// The branch ref exists in name only; nothing has been committed.
    #[error("empty repository: no commits yet")]
    EmptyRepository,

    /// No object file backs the given digest.
    #[error("object not found: {oid}")]
    ObjectNotFound { oid: String },

    /// The object file exists but its bytes do not decode.
    #[error("malformed object {oid}: {reason}")]
    MalformedObject { oid: String, reason: String },

    /// The resolved tree has no entry for the requested filename.
    #[error("'{filename}' not found in commit {oid}")]
    FileNotFoundInCommit { filename: String, oid: String },

    /// The branch ref no longer matches the parent this commit was built on.
    #[error("ref update conflict: expected {expected}, found {found}")]
    RefConflict { expected: String, found: String },
}

impl Error {
    pub fn missing_head(path: impl Into<PathBuf>) -> Self {
        Error::MissingHead { path: path.into() }
    }

    pub fn object_not_found(oid: impl Into<String>) -> Self {
        Error::ObjectNotFound { oid: oid.into() }
    }

    pub fn malformed_object(oid: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedObject {
            oid: oid.into(),
            reason: reason.into(),
        }
    }

    pub fn file_not_found_in_commit(filename: impl Into<String>, oid: impl Into<String>) -> Self {
        Error::FileNotFoundInCommit {
            filename: filename.into(),
            oid: oid.into(),
        }
    }

    pub fn ref_conflict(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::RefConflict {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
