use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::Error;
use derive_new::new;

/// Change history of a single file
///
/// Walks the commit chain from a starting commit and keeps only the commits
/// at which the file's blob digest changed relative to the parent snapshot:
/// the commit that introduced the file and every commit that replaced its
/// content. Commits that merely carry the file forward through the tree
/// merge are skipped. The walk is a loop, not recursion, so arbitrarily deep
/// histories stay on a constant stack.
#[derive(new)]
pub struct FileHistory<'r> {
    repository: &'r Repository,
    filename: String,
}

impl FileHistory<'_> {
    /// Collect the history, newest first (root commit last)
    ///
    /// A file never touched anywhere in the chain yields an empty list.
    pub fn collect(&self, start: ObjectId) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut history = Vec::new();

        // each commit is judged once its parent's tree is known, so every
        // tree is loaded exactly once along the walk
        let mut pending: Option<(ObjectId, Commit, Tree)> = None;

        for item in RevList::new(self.repository, Some(start)) {
            let (commit_oid, commit) = item?;
            let tree = self.load_tree(&commit)?;

            if let Some((child_oid, child_commit, child_tree)) = pending.take()
                && self.changed_against_parent(&child_tree, &tree)
            {
                history.push((child_oid, child_commit));
            }

            pending = Some((commit_oid, commit, tree));
        }

        // the root commit has no parent: introducing the file counts as a change
        if let Some((commit_oid, commit, tree)) = pending
            && tree.get(&self.filename).is_some()
        {
            history.push((commit_oid, commit));
        }

        Ok(history)
    }

    fn changed_against_parent(&self, tree: &Tree, parent_tree: &Tree) -> bool {
        match tree.get(&self.filename) {
            Some(blob_oid) => parent_tree.get(&self.filename) != Some(blob_oid),
            None => false,
        }
    }

    fn load_tree(&self, commit: &Commit) -> anyhow::Result<Tree> {
        self.repository
            .database()
            .parse_object_as_tree(commit.tree_oid())?
            .ok_or_else(|| {
                Error::malformed_object(commit.tree_oid().as_ref(), "expected a tree object")
                    .into()
            })
    }
}
