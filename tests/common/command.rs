use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit on master:
///
/// ```text
/// 1.txt
/// a/2.txt
/// a/b/3.txt
/// ```
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_calp_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_calp_command(repository_dir.path(), &["add", "1.txt", "a"])
        .assert()
        .success();

    calp_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_calp_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("calp").expect("Failed to find calp binary");
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn calp_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_calp_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", "fake_user"),
        ("GIT_AUTHOR_EMAIL", "fake_email@email.com"),
        ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Commit hash HEAD resolves to, following a symbolic HEAD to its branch file
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let metadata_dir = dir.join(calp::METADATA_DIR);
    let head_content = std::fs::read_to_string(metadata_dir.join("HEAD"))?;

    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let commit_sha = std::fs::read_to_string(metadata_dir.join(ref_path.trim()))?;
        Ok(commit_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}

pub fn get_branch_sha(dir: &Path, branch: &str) -> Result<String, Box<dyn std::error::Error>> {
    let path = dir
        .join(calp::METADATA_DIR)
        .join("refs")
        .join("heads")
        .join(branch);
    Ok(std::fs::read_to_string(path)?.trim().to_string())
}
