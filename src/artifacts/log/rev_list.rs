use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Error;
use derive_new::new;

/// Iterator over the commit chain, newest first
///
/// Walks from a starting commit through the parent references until the root
/// commit. Items are fallible: a digest without a backing object or a commit
/// that fails to decode surfaces as an error item rather than silently
/// ending the walk.
#[derive(new)]
pub struct RevList<'r> {
    repository: &'r Repository,
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for RevList<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.repository.database().parse_object_as_commit(&commit_oid) {
            Ok(Some(commit)) => {
                // Move to the parent commit for the next iteration
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok((commit_oid, commit)))
            }
            Ok(None) => Some(Err(Error::malformed_object(
                commit_oid.as_ref(),
                "expected a commit object",
            )
            .into())),
            Err(e) => Some(Err(e)),
        }
    }
}
