use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DEFAULT_BRANCH: &str = "master";

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create refs/heads directory")?;

        // the branch ref file itself is not created here: its absence is the
        // empty-repository state, and the first commit creates it
        self.refs()
            .set_head(format!("ref: refs/heads/{}", DEFAULT_BRANCH))
            .context("Failed to create initial HEAD reference")?;

        write!(
            self.writer(),
            "Initialized empty repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
