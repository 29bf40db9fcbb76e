//! Commit object
//!
//! Commits are point-in-time snapshots. They contain:
//! - A tree object ID (the snapshot itself)
//! - An optional parent commit ID (chaining the history)
//! - Author and committer records
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! The message is carried verbatim: decoding splits the body on the first
//! blank line and keeps everything after it untouched, trailing newlines
//! included.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Write};

/// Author or committer record
///
/// Contains name, email, and timestamp with timezone offset.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Create a record with a specific timestamp
    ///
    /// The commit pipeline computes one wall-clock timestamp per commit and
    /// passes it to both the author and the committer record.
    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Format name and email for display
    ///
    /// # Returns
    ///
    /// String in format "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Format the complete record including timestamp
    ///
    /// # Returns
    ///
    /// String in format "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Load the author record from environment variables
    ///
    /// Reads QUILL_AUTHOR_NAME and QUILL_AUTHOR_EMAIL.
    pub fn author_from_env(
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> anyhow::Result<Self> {
        let name = std::env::var("QUILL_AUTHOR_NAME").context("QUILL_AUTHOR_NAME not set")?;
        let email = std::env::var("QUILL_AUTHOR_EMAIL").context("QUILL_AUTHOR_EMAIL not set")?;

        Ok(Author::new_with_timestamp(name, email, timestamp))
    }

    /// Load the committer record from environment variables
    ///
    /// Reads QUILL_COMMITTER_NAME and QUILL_COMMITTER_EMAIL, falling back to
    /// the author's identity when either is unset. The timestamp is the
    /// author's: one clock reading per commit.
    pub fn committer_from_env(author: &Author) -> Self {
        let name = std::env::var("QUILL_COMMITTER_NAME").unwrap_or_else(|_| author.name.clone());
        let email = std::env::var("QUILL_COMMITTER_EMAIL").unwrap_or_else(|_| author.email.clone());

        Author::new_with_timestamp(name, email, author.timestamp)
    }

    /// Read an override timestamp from QUILL_AUTHOR_DATE, if set
    ///
    /// Accepts RFC 2822 or `%Y-%m-%d %H:%M:%S %z`. Used to make commits
    /// reproducible in tests.
    pub fn timestamp_from_env() -> Option<chrono::DateTime<chrono::FixedOffset>> {
        std::env::var("QUILL_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        })
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    /// Get the timestamp
    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone"
        // Split from right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid person record"));
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let name_email_part = parts[2]; // "name <email>"

        // Extract email from within angle brackets
        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid person record: missing '<'"))?;
        let email_end = name_email_part
            .find('>')
            .ok_or_else(|| anyhow::anyhow!("Invalid person record: missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?;
        let datetime = chrono::DateTime::parse_from_str(
            &format!("{} {}", datetime.format("%Y-%m-%d %H:%M:%S"), timezone),
            "%Y-%m-%d %H:%M:%S %z",
        )
        .map_err(|_| anyhow::anyhow!("Invalid timezone"))?;

        Ok(Author {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// Commit object
///
/// References one tree (the snapshot), zero or one parent commit, an author
/// record, a committer record, and the message.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a new commit
    ///
    /// # Arguments
    ///
    /// * `parent` - Parent commit ID (None for the root commit)
    /// * `tree_oid` - Tree object representing the snapshot
    /// * `author` - Author record
    /// * `committer` - Committer record
    /// * `message` - Commit message
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        committer: Author,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            author,
            committer,
            message,
        }
    }

    /// Get the first line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    /// Get the full commit message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the tree object ID
    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.author.timestamp()
    }

    fn body(&self) -> String {
        let mut body = String::new();

        body.push_str(&format!("tree {}\n", self.tree_oid.as_ref()));
        if let Some(parent) = &self.parent {
            body.push_str(&format!("parent {}\n", parent.as_ref()));
        }
        body.push_str(&format!("author {}\n", self.author.display()));
        body.push_str(&format!("committer {}\n\n", self.committer.display()));
        body.push_str(&self.message);

        body
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content_bytes = self.body().into_bytes();

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        // the field block ends at the first blank line; everything after it
        // is the message, verbatim
        let (field_block, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing blank line before message")?;

        let mut tree_oid = None;
        let mut parent = None;
        let mut author = None;
        let mut committer = None;

        for line in field_block.lines() {
            let (category, data) = line
                .split_once(' ')
                .context("Invalid commit object: unterminated field line")?;

            match category {
                "tree" => tree_oid = Some(ObjectId::try_parse(data.to_string())?),
                "parent" => parent = Some(ObjectId::try_parse(data.to_string())?),
                "author" => author = Some(Author::try_from(data)?),
                "committer" => committer = Some(Author::try_from(data)?),
                _ => return Err(anyhow::anyhow!("Invalid commit field: {category}")),
            }
        }

        Ok(Self::new(
            parent,
            tree_oid.context("Invalid commit object: missing tree line")?,
            author.context("Invalid commit object: missing author line")?,
            committer.context("Invalid commit object: missing committer line")?,
            message.to_string(),
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.body()
    }
}

#[cfg(test)]
mod tests {
    use super::{Author, Commit};
    use crate::artifacts::objects::object::{Packable, Unpackable};
    use crate::artifacts::objects::object_id::ObjectId;
    use crate::artifacts::objects::object_type::ObjectType;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn person(name: &str, email: &str) -> Author {
        let timestamp = chrono::DateTime::parse_from_rfc2822("Sat, 31 Mar 2012 08:17:22 +0900")
            .unwrap();
        Author::new_with_timestamp(name.to_string(), email.to_string(), timestamp)
    }

    fn strip_header(raw: bytes::Bytes) -> Cursor<bytes::Bytes> {
        let mut reader = Cursor::new(raw);
        ObjectType::parse_object_type(&mut reader).unwrap();
        reader
    }

    #[rstest]
    #[case::with_parent(Some('b'))]
    #[case::root_commit(None)]
    fn test_commit_round_trip(#[case] parent_fill: Option<char>) {
        let commit = Commit::new(
            parent_fill.map(oid),
            oid('a'),
            person("Yun", "yun@example.org"),
            person("Soo-jin Park", "sjp@example.org"),
            "Rework the front page.\n\nSecond paragraph.".to_string(),
        );

        let raw = commit.serialize().unwrap();
        let decoded = Commit::deserialize(strip_header(raw)).unwrap();

        assert_eq!(decoded, commit);
    }

    #[test]
    fn test_message_trailing_newline_survives_round_trip() {
        let commit = Commit::new(
            None,
            oid('a'),
            person("Yun", "yun@example.org"),
            person("Yun", "yun@example.org"),
            "trailing newline kept\n".to_string(),
        );

        let raw = commit.serialize().unwrap();
        let decoded = Commit::deserialize(strip_header(raw)).unwrap();

        assert_eq!(decoded.message(), "trailing newline kept\n");
    }

    #[test]
    fn test_serialized_field_layout() {
        let commit = Commit::new(
            Some(oid('b')),
            oid('a'),
            person("Yun", "yun@example.org"),
            person("Yun", "yun@example.org"),
            "message".to_string(),
        );

        let raw = commit.serialize().unwrap();
        let text = String::from_utf8(raw.to_vec()).unwrap();
        let body = text.split_once('\0').unwrap().1;

        let expected = format!(
            "tree {}\nparent {}\nauthor {} <{}> {} {}\ncommitter {} <{}> {} {}\n\nmessage",
            "a".repeat(40),
            "b".repeat(40),
            "Yun",
            "yun@example.org",
            1333149442,
            "+0900",
            "Yun",
            "yun@example.org",
            1333149442,
            "+0900",
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn test_person_record_round_trip() {
        let author = person("Soo-jin Park", "sjp@example.org");
        let parsed = Author::try_from(author.display().as_str()).unwrap();

        assert_eq!(parsed, author);
    }

    #[rstest]
    #[case::missing_email_brackets("Yun yun@example.org 1333149442 +0900")]
    #[case::non_numeric_timestamp("Yun <yun@example.org> soon +0900")]
    #[case::truncated("Yun")]
    fn test_malformed_person_record_is_rejected(#[case] record: &str) {
        assert!(Author::try_from(record).is_err());
    }

    #[test]
    fn test_commit_without_blank_line_is_malformed() {
        let body = b"tree aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_vec();
        assert!(Commit::deserialize(Cursor::new(body)).is_err());
    }
}
