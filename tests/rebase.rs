use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};
use calp::commands::porcelain::rebase::RebaseOutcome;
use calp::errors::CalpError;
use common::command::{
    calp_commit, get_branch_sha, get_head_commit_sha, init_repository_dir, run_calp_command,
};
use common::file::read_file;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

mod common;

/// On top of the initial commit, feature adds `f1.txt` then `f2.txt` while master
/// rewrites `1.txt`. HEAD is on feature.
#[fixture]
fn feature_behind_master(init_repository_dir: TempDir) -> TempDir {
    let dir = init_repository_dir.path();
    run_calp_command(dir, &["checkout", "-b", "feature"])
        .assert()
        .success();
    for (file, message) in [("f1.txt", "Feature one"), ("f2.txt", "Feature two")] {
        std::fs::write(dir.join(file), format!("{file}\n")).unwrap();
        run_calp_command(dir, &["add", file]).assert().success();
        calp_commit(dir, message).assert().success();
    }

    run_calp_command(dir, &["checkout", "master"])
        .assert()
        .success();
    std::fs::write(dir.join("1.txt"), "one on master").unwrap();
    run_calp_command(dir, &["add", "1.txt"]).assert().success();
    calp_commit(dir, "Master moves on").assert().success();

    run_calp_command(dir, &["checkout", "feature"])
        .assert()
        .success();

    init_repository_dir
}

#[rstest]
fn rebase_replays_branch_commits_oldest_first(
    feature_behind_master: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = feature_behind_master.path();
    let repository = common::open_repository(dir);
    let master_before = get_branch_sha(dir, "master")?;

    let outcome = repository.rebase("master")?;

    let (onto, head, replayed) = match outcome {
        RebaseOutcome::Rebased {
            onto,
            head,
            replayed,
        } => (onto, head, replayed),
        RebaseOutcome::UpToDate => panic!("expected the branch to be replayed"),
    };
    assert_eq!(onto.to_string(), master_before);
    assert_eq!(replayed.len(), 2);
    assert_eq!(replayed.last(), Some(&head));

    let first = repository.database().parse_object_as_commit(&replayed[0])?;
    let second = repository.database().parse_object_as_commit(&replayed[1])?;
    assert_eq!(first.message(), "Feature one\n");
    assert_eq!(first.parent(), Some(&onto));
    assert_eq!(second.message(), "Feature two\n");
    assert_eq!(second.parent(), Some(&replayed[0]));

    let history = repository
        .log()?
        .into_iter()
        .map(|(_, commit)| commit.short_message())
        .collect::<Vec<_>>();
    assert_eq!(
        history,
        vec!["Feature two", "Feature one", "Master moves on", "Initial commit"]
    );

    Ok(())
}

#[rstest]
fn rebase_leaves_head_on_the_rebased_branch(
    feature_behind_master: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = feature_behind_master.path();
    let master_before = get_branch_sha(dir, "master")?;

    run_calp_command(dir, &["rebase", "master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rebased 2 commit(s)"));

    assert_eq!(
        common::read_metadata_file(dir, "HEAD"),
        "ref: refs/heads/feature"
    );
    assert_eq!(get_branch_sha(dir, "master")?, master_before);
    assert_eq!(get_head_commit_sha(dir)?, get_branch_sha(dir, "feature")?);

    assert_eq!(read_file(&dir.join("1.txt")), "one on master");
    assert_eq!(read_file(&dir.join("f1.txt")), "f1.txt\n");
    assert_eq!(read_file(&dir.join("f2.txt")), "f2.txt\n");
    assert!(common::open_repository(dir).status()?.is_clean());

    Ok(())
}

#[rstest]
fn rebase_onto_the_same_commit_is_up_to_date(init_repository_dir: TempDir) {
    let repository = common::open_repository(init_repository_dir.path());
    repository.checkout("topic", true).unwrap();
    let head_before = repository.refs().read_head().unwrap();

    let outcome = repository.rebase("master").unwrap();

    assert_eq!(outcome, RebaseOutcome::UpToDate);
    assert_eq!(repository.refs().read_head().unwrap(), head_before);
}

#[rstest]
fn rebase_onto_a_missing_branch_fails(feature_behind_master: TempDir) {
    let repository = common::open_repository(feature_behind_master.path());

    let error = repository.rebase("nowhere").unwrap_err();

    assert!(matches!(
        common::calp_error(&error),
        CalpError::BranchNotFound(name) if name == "nowhere"
    ));
}

#[rstest]
fn rebase_refuses_a_dirty_tree(
    feature_behind_master: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = feature_behind_master.path();
    let repository = common::open_repository(dir);
    let feature_before = get_branch_sha(dir, "feature")?;
    feature_behind_master.child("f1.txt").write_str("local edit")?;

    let error = repository.rebase("master").unwrap_err();

    assert!(matches!(
        common::calp_error(&error),
        CalpError::UncommittedChanges(_)
    ));
    assert_eq!(get_branch_sha(dir, "feature")?, feature_before);
    assert_eq!(read_file(&dir.join("f1.txt")), "local edit");

    Ok(())
}

#[rstest]
fn rebase_requires_a_branch_to_be_checked_out(
    feature_behind_master: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = feature_behind_master.path();
    let head = get_head_commit_sha(dir)?;
    std::fs::write(dir.join(".calp").join("HEAD"), &head)?;

    let error = common::open_repository(dir).rebase("master").unwrap_err();

    assert!(matches!(
        common::calp_error(&error),
        CalpError::DetachedHead
    ));

    Ok(())
}
