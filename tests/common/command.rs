use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_quill_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

pub fn run_quill_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("quill").expect("Failed to find quill binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Commit the given files (every workspace file when none are given) with a
/// fixed author identity.
pub fn quill_commit(dir: &Path, message: &str, files: &[&str]) -> Command {
    let mut args = vec!["commit", "-m", message];
    args.extend_from_slice(files);

    let mut cmd = run_quill_command(dir, &args);
    cmd.envs(vec![
        ("QUILL_AUTHOR_NAME", "fake_user"),
        ("QUILL_AUTHOR_EMAIL", "fake_email@email.com"),
    ]);
    cmd
}

/// Get the current HEAD commit SHA by following the HEAD indirection
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".quill").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    // HEAD contains either a commit SHA or a ref like "ref: refs/heads/master"
    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".quill").join(ref_path.trim());
        let commit_sha = std::fs::read_to_string(ref_file)?;
        Ok(commit_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}

/// Count every object file stored in the database buckets
pub fn count_object_files(dir: &Path) -> usize {
    let objects_path = dir.join(".quill").join("objects");

    walkdir::WalkDir::new(objects_path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .count()
}
