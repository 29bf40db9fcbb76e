//! References (the branch ref and HEAD)
//!
//! A reference is a file holding either a 40-character commit digest (direct
//! reference) or `ref: <path>` (symbolic reference). HEAD is symbolic and
//! names the current branch ref; the branch ref holds the digest of the
//! latest commit.
//!
//! Only the commit pipeline writes the branch ref. Readers distinguish two
//! negative cases: a missing HEAD file is a fatal configuration error, while
//! a missing (or empty) branch ref file just means nothing has been
//! committed yet.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Error;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::{Read, Seek, SeekFrom, Write};
use std::ops::DerefMut;
use std::path::Path;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// References manager
///
/// Handles reading HEAD and advancing the branch ref it names. Ref updates
/// take an exclusive file lock and re-check the previous value, so a racing
/// writer surfaces as a conflict instead of a silently lost commit.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository control directory (typically `.quill`)
    path: Box<Path>,
}

/// Internal representation of a reference file's content
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref file
    SymRef { target: String },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                target: symref_match[1].to_string(),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Read the commit digest HEAD ultimately points to
    ///
    /// Follows the HEAD indirection to the branch ref. Returns `None` when
    /// the branch ref does not exist yet (empty repository); a missing HEAD
    /// file itself is the fatal [`Error::MissingHead`].
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        let head_path = self.head_path();
        if !head_path.exists() {
            return Err(Error::missing_head(head_path).into());
        }

        self.read_symref(&head_path)
    }

    /// Read a reference file, following symbolic indirection
    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { target }) => {
                self.read_symref(self.path.join(target).as_path())
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// Resolve the file the HEAD indirection chain terminates at
    ///
    /// That file is the one `advance` writes, whether or not it exists yet.
    fn resolve_ref_path(&self, path: Box<Path>) -> anyhow::Result<Box<Path>> {
        match SymRefOrOid::read_symref_or_oid(&path)? {
            Some(SymRefOrOid::SymRef { target }) => {
                self.resolve_ref_path(self.path.join(target).into_boxed_path())
            }
            Some(SymRefOrOid::Oid(_)) | None => Ok(path),
        }
    }

    /// Advance the branch ref to a new commit digest
    ///
    /// Compare-and-swap under an exclusive file lock: the ref must still
    /// hold `expected` (the parent digest the commit was built on, `None`
    /// for a root commit) or the update fails with [`Error::RefConflict`]
    /// and the ref is left unchanged.
    pub fn advance(&self, expected: Option<&ObjectId>, oid: &ObjectId) -> anyhow::Result<()> {
        let head_path = self.head_path();
        if !head_path.exists() {
            return Err(Error::missing_head(head_path).into());
        }

        let ref_path = self.resolve_ref_path(head_path)?;
        std::fs::create_dir_all(ref_path.parent().with_context(|| {
            format!("failed to resolve parent directory for ref at {ref_path:?}")
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&ref_path)
            .with_context(|| format!("failed to open ref file at {ref_path:?}"))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;

        // re-read under the lock: another writer may have advanced the ref
        // after our parent was resolved
        let mut content = String::new();
        lock.deref_mut().read_to_string(&mut content)?;
        let content = content.trim();
        let current = if content.is_empty() {
            None
        } else {
            Some(ObjectId::try_parse(content.to_string())?)
        };

        if current.as_ref() != expected {
            let display = |oid: Option<&ObjectId>| {
                oid.map(|oid| oid.as_ref().to_string())
                    .unwrap_or_else(|| "(none)".to_string())
            };
            return Err(Error::ref_conflict(display(expected), display(current.as_ref())).into());
        }

        let file = lock.deref_mut();
        file.seek(SeekFrom::Start(0))?;
        file.set_len(0)?;
        file.write_all(oid.as_ref().as_bytes())?;

        Ok(())
    }

    /// Overwrite a ref file wholesale (used by init to create HEAD)
    pub fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {path:?}")
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {path:?}"))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn set_head(&self, raw_ref: String) -> anyhow::Result<()> {
        self.update_ref_file(self.head_path(), raw_ref)
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
