use assert_fs::fixture::{FileWriteStr, PathChild};
use fake::Fake;
use fake::faker::lorem::en::Words;
use predicates::prelude::predicate;

mod common;

use common::command::run_quill_command;

#[test]
fn hash_object_writes_blob_and_cat_file_reads_it_back() -> Result<(), Box<dyn std::error::Error>>
{
    let dir = assert_fs::TempDir::new()?;
    run_quill_command(dir.path(), &["init"]).assert().success();

    let content = Words(5..10).fake::<Vec<String>>().join(" ");
    dir.child("page.txt").write_str(&content)?;

    let oid = run_quill_command(dir.path(), &["hash-object", "-w", "page.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9a-f]{40}$")?)
        .get_output()
        .stdout
        .clone();
    let oid = String::from_utf8(oid)?;

    run_quill_command(dir.path(), &["cat-file", "-p", &oid])
        .assert()
        .success()
        .stdout(predicate::eq(content.as_str()));

    // an abbreviated digest resolves through the object store
    run_quill_command(dir.path(), &["cat-file", "-p", &oid[..8]])
        .assert()
        .success()
        .stdout(predicate::eq(content.as_str()));

    Ok(())
}

#[test]
fn hash_object_without_write_does_not_store() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_quill_command(dir.path(), &["init"]).assert().success();

    dir.child("page.txt").write_str("never stored")?;

    let oid = run_quill_command(dir.path(), &["hash-object", "page.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let oid = String::from_utf8(oid)?;

    run_quill_command(dir.path(), &["cat-file", "-p", &oid])
        .assert()
        .failure()
        .stderr(predicate::str::contains("object not found"));

    Ok(())
}

#[test]
fn hashing_the_same_content_yields_the_same_digest() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    run_quill_command(dir.path(), &["init"]).assert().success();

    dir.child("one.txt").write_str("same bytes")?;
    dir.child("two.txt").write_str("same bytes")?;

    let first = run_quill_command(dir.path(), &["hash-object", "one.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let second = run_quill_command(dir.path(), &["hash-object", "two.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(first, second);

    Ok(())
}
