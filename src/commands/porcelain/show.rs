use crate::areas::repository::Repository;
use crate::errors::Error;
use std::io::Write;

impl Repository {
    /// Print the current content of a file, as of the HEAD commit
    pub fn show(&mut self, filename: &str) -> anyhow::Result<()> {
        let head_oid = self.refs().read_head()?.ok_or(Error::EmptyRepository)?;

        let commit = self
            .database()
            .parse_object_as_commit(&head_oid)?
            .ok_or_else(|| {
                Error::malformed_object(head_oid.as_ref(), "expected a commit object")
            })?;
        let tree = self
            .database()
            .parse_object_as_tree(commit.tree_oid())?
            .ok_or_else(|| {
                Error::malformed_object(commit.tree_oid().as_ref(), "expected a tree object")
            })?;

        let blob_oid = tree
            .get(filename)
            .ok_or_else(|| Error::file_not_found_in_commit(filename, head_oid.as_ref()))?;
        let blob = self
            .database()
            .parse_object_as_blob(blob_oid)?
            .ok_or_else(|| {
                Error::malformed_object(blob_oid.as_ref(), "expected a blob object")
            })?;

        // raw bytes: blob content is not necessarily text
        self.writer().write_all(blob.content())?;

        Ok(())
    }
}
