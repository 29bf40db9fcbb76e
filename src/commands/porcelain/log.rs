use crate::areas::repository::Repository;
use crate::artifacts::log::file_history::FileHistory;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Print the change history of a file, newest commit first
    ///
    /// Only commits where the file's blob digest changed appear; commits
    /// that carry the file forward unchanged are skipped. An empty
    /// repository, or a file never committed, prints nothing.
    pub fn log(&mut self, filename: &str) -> anyhow::Result<()> {
        let Some(head_oid) = self.refs().read_head()? else {
            return Ok(());
        };

        let history = FileHistory::new(self, filename.to_string()).collect(head_oid)?;

        for (commit_oid, commit) in &history {
            self.display_commit(commit_oid, commit)?;
        }

        Ok(())
    }

    fn display_commit(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{}",
            format!("commit {}", commit_oid.as_ref()).yellow()
        )?;
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {}", message_line)?;
        }
        writeln!(self.writer())?;

        Ok(())
    }
}
