//! Tree object
//!
//! Trees are flat snapshots: an ordered mapping from filename to the blob ID
//! holding that file's content.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `100644 <name>\0<20-byte-sha1>`
//!
//! Entries serialize in sorted filename order so a tree's digest depends only
//! on its content, never on the order files were committed in.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Entry mode for regular files; the flat namespace holds nothing else.
const FILE_MODE: &str = "100644";

/// Tree object mapping filenames to blob IDs
///
/// Invariant: filenames within one tree are unique (enforced by the map).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, ObjectId>,
}

impl Tree {
    /// Look up the blob ID a filename maps to
    pub fn get(&self, filename: &str) -> Option<&ObjectId> {
        self.entries.get(filename)
    }

    /// Add or replace a filename → blob ID mapping
    pub fn insert(&mut self, filename: String, oid: ObjectId) {
        self.entries.insert(filename, oid);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.entries.iter()
    }

    /// Overlay a partial tree onto this one
    ///
    /// Entries only in `self` are carried forward unchanged, entries only in
    /// `updates` are added, and filename collisions take the value from
    /// `updates`. This is how a commit of changed files inherits everything
    /// else from the parent snapshot.
    pub fn overlay(mut self, updates: Tree) -> Tree {
        self.entries.extend(updates.entries);
        self
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        for (name, oid) in &self.entries {
            let header = format!("{} {}", FILE_MODE, name);
            content_bytes.write_all(header.as_bytes())?;
            content_bytes.push(0);
            oid.write_h40_to(&mut content_bytes)?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            // Must end with ' ' or it's malformed
            if *mode_bytes.last().unwrap() != b' ' {
                return Err(anyhow::anyhow!("unexpected EOF in mode"));
            }
            mode_bytes.pop(); // drop the space

            let mode = std::str::from_utf8(&mode_bytes)?;
            if mode.is_empty() || !mode.bytes().all(|b| b.is_ascii_digit()) {
                return Err(anyhow::anyhow!("invalid entry mode: {mode:?}"));
            }

            // Read "name\0"
            name_bytes.clear();
            let n = reader.read_until(b'\0', &mut name_bytes)?;
            if n == 0 || *name_bytes.last().unwrap() != b'\0' {
                return Err(anyhow::anyhow!("unexpected EOF in name"));
            }
            name_bytes.pop(); // drop NUL
            let name = std::str::from_utf8(&name_bytes)?.to_owned();

            // Read object id
            let oid =
                ObjectId::read_h40_from(&mut reader).context("unexpected EOF in object id")?;

            entries.insert(name, oid);
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(name, oid)| format!("{} blob {}\t{}", FILE_MODE, oid.as_ref(), name))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::artifacts::objects::object::{Packable, Unpackable};
    use crate::artifacts::objects::object_id::ObjectId;
    use crate::artifacts::objects::object_type::ObjectType;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn strip_header(raw: bytes::Bytes) -> Cursor<bytes::Bytes> {
        let mut reader = Cursor::new(raw);
        ObjectType::parse_object_type(&mut reader).unwrap();
        reader
    }

    #[test]
    fn test_tree_round_trip() {
        let mut tree = Tree::default();
        tree.insert("readme.md".to_string(), oid('a'));
        tree.insert("frontpage".to_string(), oid('b'));
        tree.insert("notes/today".to_string(), oid('c'));

        let raw = tree.serialize().unwrap();
        let decoded = Tree::deserialize(strip_header(raw)).unwrap();

        assert_eq!(decoded, tree);
    }

    #[test]
    fn test_empty_tree_round_trip() {
        let tree = Tree::default();
        let raw = tree.serialize().unwrap();
        assert_eq!(raw.as_ref(), b"tree 0\0");

        let decoded = Tree::deserialize(strip_header(raw)).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_serialized_entry_layout() {
        let mut tree = Tree::default();
        tree.insert("page".to_string(), oid('a'));

        let raw = tree.serialize().unwrap();
        // "100644 page\0" + 20 raw digest bytes, wrapped in "tree <len>\0"
        let mut expected = b"tree 32\0100644 page\0".to_vec();
        expected.extend(std::iter::repeat_n(0xaau8, 20));
        assert_eq!(raw.as_ref(), expected.as_slice());
    }

    #[test]
    fn test_entries_serialize_in_sorted_order_regardless_of_insertion() {
        let mut first = Tree::default();
        first.insert("b".to_string(), oid('b'));
        first.insert("a".to_string(), oid('a'));

        let mut second = Tree::default();
        second.insert("a".to_string(), oid('a'));
        second.insert("b".to_string(), oid('b'));

        assert_eq!(
            first.serialize().unwrap(),
            second.serialize().unwrap()
        );
    }

    #[test]
    fn test_overlay_keeps_parent_entries_and_takes_new_values() {
        let mut parent = Tree::default();
        parent.insert("a".to_string(), oid('0'));
        parent.insert("b".to_string(), oid('1'));

        let mut partial = Tree::default();
        partial.insert("a".to_string(), oid('2'));

        let merged = parent.overlay(partial);

        assert_eq!(merged.get("a"), Some(&oid('2')));
        assert_eq!(merged.get("b"), Some(&oid('1')));
        assert_eq!(merged.entries().count(), 2);
    }

    #[test]
    fn test_truncated_entry_is_malformed() {
        // entry header but only 5 of the 20 digest bytes
        let mut body = b"100644 page\0".to_vec();
        body.extend_from_slice(&[0xaa; 5]);

        assert!(Tree::deserialize(Cursor::new(body)).is_err());
    }

    #[test]
    fn test_missing_name_terminator_is_malformed() {
        let body = b"100644 page-without-nul".to_vec();
        assert!(Tree::deserialize(Cursor::new(body)).is_err());
    }
}
