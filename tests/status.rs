use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};
use calp::artifacts::status::status_info::StatusInfo;
use common::command::{init_repository_dir, run_calp_command};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::PathBuf;

mod common;

#[rstest]
fn clean_tree_reports_nothing(init_repository_dir: TempDir) {
    let repository = common::open_repository(init_repository_dir.path());

    let status = repository.status().expect("status");

    assert!(status.is_clean());
    run_calp_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout("");
}

#[rstest]
fn status_classifies_modified_untracked_and_deleted(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository = common::open_repository(init_repository_dir.path());
    init_repository_dir.child("1.txt").write_str("changed")?;
    init_repository_dir.child("new.txt").write_str("fresh")?;
    init_repository_dir.child("z/deep.txt").write_str("deeper")?;
    std::fs::remove_file(init_repository_dir.path().join("a").join("b").join("3.txt"))?;

    let status = repository.status()?;

    assert_eq!(
        status,
        StatusInfo {
            modified: vec!["1.txt".to_string()],
            untracked: vec!["new.txt".to_string(), "z/deep.txt".to_string()],
            deleted: vec!["a/b/3.txt".to_string()],
        }
    );

    run_calp_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" M 1.txt"))
        .stdout(predicate::str::contains(" D a/b/3.txt"))
        .stdout(predicate::str::contains("?? new.txt"));

    Ok(())
}

#[rstest]
fn a_moved_file_is_untracked_but_not_deleted(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository = common::open_repository(init_repository_dir.path());
    std::fs::rename(
        init_repository_dir.path().join("1.txt"),
        init_repository_dir.path().join("moved.txt"),
    )?;

    let status = repository.status()?;

    // the content still exists in the worktree under another name
    assert_eq!(status.untracked, vec!["moved.txt"]);
    assert!(status.deleted.is_empty());
    assert!(status.modified.is_empty());

    Ok(())
}

#[rstest]
fn staged_changes_leave_the_tree_clean(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository = common::open_repository(init_repository_dir.path());
    init_repository_dir.child("1.txt").write_str("staged")?;

    repository.add(&[PathBuf::from("1.txt")])?;

    assert!(repository.status()?.is_clean());

    Ok(())
}

#[cfg(unix)]
#[rstest]
fn non_utf8_file_names_do_not_break_status(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let repository = common::open_repository(init_repository_dir.path());
    let bad_name = OsStr::from_bytes(b"bad\xff.txt");
    std::fs::write(init_repository_dir.path().join(bad_name), "bad")?;
    init_repository_dir.child("ok.txt").write_str("ok")?;

    let status = repository.status()?;

    assert_eq!(status.untracked, vec!["ok.txt".to_string()]);
    assert!(status.modified.is_empty());
    assert!(status.deleted.is_empty());

    Ok(())
}
