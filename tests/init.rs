use assert_fs::TempDir;
use calp::areas::repository::Repository;
use calp::errors::CalpError;
use common::command::{repository_dir, run_calp_command};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn init_repository_successfully(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir_absolute_path = repository_dir.path().canonicalize()?.display().to_string();

    run_calp_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty repository in .+\.calp\n$",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    let metadata_dir = repository_dir.path().join(".calp");
    assert!(metadata_dir.join("objects").is_dir());
    assert!(metadata_dir.join("refs").join("heads").is_dir());
    assert!(metadata_dir.join("refs").join("tags").is_dir());
    assert_eq!(
        common::read_metadata_file(repository_dir.path(), "HEAD"),
        "ref: refs/heads/master"
    );
    // the branch file appears with the first commit
    assert!(!metadata_dir.join("refs").join("heads").join("master").exists());

    Ok(())
}

#[rstest]
fn init_creates_missing_target_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = repository_dir.path().join("nested").join("project");

    run_calp_command(repository_dir.path(), &["init", "nested/project"])
        .assert()
        .success();

    assert!(target.join(".calp").join("HEAD").is_file());

    Ok(())
}

#[rstest]
fn init_twice_fails_with_repository_already_exists(repository_dir: TempDir) {
    Repository::init(repository_dir.path()).expect("first init succeeds");

    let error = Repository::init(repository_dir.path()).unwrap_err();
    assert!(matches!(
        common::calp_error(&error),
        CalpError::RepositoryAlreadyExists(_)
    ));

    run_calp_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[rstest]
fn commands_outside_a_repository_fail(repository_dir: TempDir) {
    run_calp_command(repository_dir.path(), &["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a calp repository"));
}

#[rstest]
fn repository_is_found_from_a_subdirectory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    Repository::init(repository_dir.path())?;
    let nested = repository_dir.path().join("src").join("deep");
    std::fs::create_dir_all(&nested)?;

    let repository = Repository::find(&nested)?;

    assert_eq!(repository.path(), repository_dir.path().canonicalize()?);

    Ok(())
}
