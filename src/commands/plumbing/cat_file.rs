use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Error;
use std::io::Write;

/// Shortest accepted abbreviation of an object ID
const MIN_OID_PREFIX_LENGTH: usize = 4;

impl Repository {
    /// Pretty-print an object by full or abbreviated digest
    pub fn cat_file(&mut self, sha: &str) -> anyhow::Result<()> {
        let object_id = self.resolve_object_id(sha)?;
        let object = self.database().parse_object(&object_id)?;

        let display = match object {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        };

        write!(self.writer(), "{}", display)?;

        Ok(())
    }

    fn resolve_object_id(&self, sha: &str) -> anyhow::Result<ObjectId> {
        if sha.len() == OBJECT_ID_LENGTH {
            return ObjectId::try_parse(sha.to_string());
        }

        if sha.len() < MIN_OID_PREFIX_LENGTH {
            anyhow::bail!("object ID prefix too short: {sha}");
        }

        let mut matches = self.database().find_objects_by_prefix(sha)?;
        match matches.len() {
            0 => Err(Error::object_not_found(sha).into()),
            1 => Ok(matches.remove(0)),
            _ => {
                let mut candidates = Vec::new();
                for oid in &matches {
                    let object_type = self.database().get_object_type(oid)?;
                    candidates.push(format!("  {} {}", oid.to_short_oid(), object_type));
                }

                Err(anyhow::anyhow!(
                    "short object ID {sha} is ambiguous\ncandidates:\n{}",
                    candidates.join("\n")
                ))
            }
        }
    }
}
