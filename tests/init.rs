use assert_cmd::Command;
use predicates::prelude::predicate;

mod common;

#[test]
fn new_repository_initiated_with_quill_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let dir_absolute_path = dir.path().canonicalize()?.display().to_string();
    let mut sut = Command::cargo_bin("quill")?;

    sut.arg("init").arg(dir.path());

    sut.assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty repository in .+$",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    Ok(())
}

#[test]
fn init_creates_the_storage_skeleton() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    common::command::run_quill_command(dir.path(), &["init"])
        .assert()
        .success();

    let control_dir = dir.path().join(".quill");
    assert!(control_dir.join("objects").is_dir());
    assert!(control_dir.join("refs").join("heads").is_dir());

    let head_content = std::fs::read_to_string(control_dir.join("HEAD"))?;
    assert_eq!(head_content, "ref: refs/heads/master");

    // the branch ref file itself only appears with the first commit
    assert!(!control_dir.join("refs").join("heads").join("master").exists());

    Ok(())
}

#[test]
fn init_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    common::command::run_quill_command(dir.path(), &["init"])
        .assert()
        .success();
    common::command::run_quill_command(dir.path(), &["init"])
        .assert()
        .success();

    Ok(())
}
