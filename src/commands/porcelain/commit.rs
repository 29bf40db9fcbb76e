use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::Error;
use std::io::Write;
use std::path::PathBuf;

impl Repository {
    /// Create a new commit from the given files (or the whole workspace)
    ///
    /// Returns the digest of the new commit.
    ///
    /// Sequencing is load-bearing: blobs are stored before the tree, the
    /// tree before the commit, and the commit before the ref advances, since
    /// each step's digest feeds the next. The head lock is held across
    /// resolve-parent -> advance so in-process commits serialize; a racing
    /// external writer is caught by the ref store's compare-and-swap.
    pub async fn commit(&mut self, paths: &[PathBuf], message: &str) -> anyhow::Result<ObjectId> {
        let head_lock = self.head_lock();
        let _guard = head_lock.lock().await;

        let files = if paths.is_empty() {
            self.workspace().list_files(None)?
        } else {
            paths.to_vec()
        };

        // store every changed file as a blob, collecting the partial tree
        let mut partial_tree = Tree::default();
        for file_path in &files {
            let blob = self.workspace().parse_blob(file_path)?;
            let blob_oid = blob.object_id()?;
            self.database().store(blob)?;
            partial_tree.insert(file_path.to_string_lossy().to_string(), blob_oid);
        }

        // overlay the partial tree onto the parent snapshot, so files left
        // out of this commit are carried forward unchanged
        let parent = self.refs().read_head()?;
        let tree = match &parent {
            Some(parent_oid) => {
                let parent_commit = self
                    .database()
                    .parse_object_as_commit(parent_oid)?
                    .ok_or_else(|| {
                        Error::malformed_object(parent_oid.as_ref(), "expected a commit object")
                    })?;
                let parent_tree = self
                    .database()
                    .parse_object_as_tree(parent_commit.tree_oid())?
                    .ok_or_else(|| {
                        Error::malformed_object(
                            parent_commit.tree_oid().as_ref(),
                            "expected a tree object",
                        )
                    })?;

                parent_tree.overlay(partial_tree)
            }
            None => partial_tree,
        };

        let tree_oid = tree.object_id()?;
        self.database().store(tree)?;

        // one clock reading, shared by the author and committer records
        let timestamp =
            Author::timestamp_from_env().unwrap_or_else(|| chrono::Local::now().fixed_offset());
        let author = Author::author_from_env(timestamp)?;
        let committer = Author::committer_from_env(&author);
        let message = message.trim().to_string();

        let commit = Commit::new(parent.clone(), tree_oid, author, committer, message);
        let commit_oid = commit.object_id()?;
        self.database().store(commit.clone())?;
        self.refs().advance(parent.as_ref(), &commit_oid)?;

        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        write!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_oid)
    }
}
