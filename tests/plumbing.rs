use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};
use calp::areas::repository::Repository;
use calp::artifacts::objects::object_type::ObjectType;
use calp::artifacts::objects::tree::EntryMode;
use calp::commands::plumbing::hash_object::hash_detached;
use calp::errors::CalpError;
use common::command::{init_repository_dir, repository_dir, run_calp_command};
use flate2::read::ZlibDecoder;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Read;
use std::path::PathBuf;

mod common;

const TEST_BLOB_OID: &str = "9daeafb9864cf43055ae93beb0afd6c7d144bfa4";

#[rstest]
fn hash_object_writes_the_known_blob(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_calp_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir.child("test.txt").write_str("test\n")?;

    run_calp_command(repository_dir.path(), &["hash-object", "-w", "test.txt"])
        .assert()
        .success()
        .stdout(format!("{TEST_BLOB_OID}\n"));

    let object_path = repository_dir
        .path()
        .join(".calp")
        .join("objects")
        .join(&TEST_BLOB_OID[..2])
        .join(&TEST_BLOB_OID[2..]);
    let mut stored = Vec::new();
    ZlibDecoder::new(std::fs::File::open(object_path)?).read_to_end(&mut stored)?;
    assert_eq!(stored, b"blob 5\0test\n");

    run_calp_command(repository_dir.path(), &["cat-file", "blob", TEST_BLOB_OID])
        .assert()
        .success()
        .stdout("test\n");

    Ok(())
}

#[rstest]
fn hash_object_without_write_stores_nothing(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository = Repository::init(repository_dir.path())?;
    repository_dir.child("test.txt").write_str("test\n")?;

    let oid = repository.hash_file(
        ObjectType::Blob,
        &repository_dir.path().join("test.txt"),
        false,
    )?;

    assert_eq!(oid.as_ref(), TEST_BLOB_OID);
    assert!(!repository.database().exists(&oid));
    assert_eq!(hash_detached(ObjectType::Blob, b"test\n")?, oid);

    Ok(())
}

#[rstest]
fn hash_object_rejects_a_malformed_tree_body(repository_dir: TempDir) {
    let repository = Repository::init(repository_dir.path()).expect("init");

    let error = repository
        .hash_object(ObjectType::Tree, b"not a tree", true)
        .unwrap_err();

    assert!(matches!(
        common::calp_error(&error),
        CalpError::MalformedObject { kind: "tree", .. }
    ));
}

#[rstest]
fn hash_object_rejects_a_zero_padded_directory_mode(repository_dir: TempDir) {
    let repository = Repository::init(repository_dir.path()).expect("init");
    let mut body = b"040000 A\0".to_vec();
    body.extend([0x11; 20]);

    let error = repository
        .hash_object(ObjectType::Tree, &body, true)
        .unwrap_err();

    assert!(matches!(
        common::calp_error(&error),
        CalpError::MalformedObject { kind: "tree", .. }
    ));
    assert!(
        !repository_dir
            .path()
            .join(".calp/objects")
            .read_dir()
            .expect("objects dir")
            .any(|entry| entry.expect("entry").path().is_dir())
    );
}

#[rstest]
fn hash_object_rejects_an_unknown_type(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_calp_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir.child("test.txt").write_str("test\n")?;

    run_calp_command(repository_dir.path(), &["hash-object", "-t", "tag", "test.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown object type: tag"));

    Ok(())
}

#[rstest]
fn nested_index_round_trips_through_ls_tree(init_repository_dir: TempDir) {
    let repository = common::open_repository(init_repository_dir.path());

    let listing = repository.ls_tree("HEAD", true).expect("ls-tree -r");
    let paths = listing
        .iter()
        .map(|entry| entry.path.as_str())
        .collect::<Vec<_>>();
    assert_eq!(paths, vec!["1.txt", "a/2.txt", "a/b/3.txt"]);

    let index = repository.load_index().expect("index");
    for (entry, listed) in index.entries().zip(&listing) {
        assert_eq!(entry.path, listed.path);
        assert_eq!(entry.oid, listed.oid);
        assert_eq!(listed.object_type, ObjectType::Blob);
    }
}

#[rstest]
fn ls_tree_lists_one_level_with_child_types(init_repository_dir: TempDir) {
    let repository = common::open_repository(init_repository_dir.path());

    let listing = repository.ls_tree("master", false).expect("ls-tree");

    let summary = listing
        .iter()
        .map(|entry| (entry.mode, entry.object_type, entry.path.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            (EntryMode::Regular, ObjectType::Blob, "1.txt"),
            (EntryMode::Directory, ObjectType::Tree, "a"),
        ]
    );

    run_calp_command(init_repository_dir.path(), &["ls-tree", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^100644 blob [0-9a-f]{40}\t1\.txt\n040000 tree [0-9a-f]{40}\ta\n$").unwrap());
}

#[rstest]
fn cat_file_follows_a_commit_to_its_tree(init_repository_dir: TempDir) {
    let repository = common::open_repository(init_repository_dir.path());

    let (object_type, body) = repository
        .cat_file(Some(ObjectType::Tree), "HEAD")
        .expect("cat-file tree HEAD");
    let (_, commit_body) = repository.cat_file(None, "HEAD").expect("cat-file HEAD");

    assert_eq!(object_type, ObjectType::Tree);
    let commit_text = String::from_utf8_lossy(&commit_body).to_string();
    assert!(commit_text.starts_with("tree "));
    assert!(commit_text.ends_with("\n\nInitial commit\n"));
    // binary tree entries start with the mode and name of the first child
    assert!(body.starts_with(b"100644 1.txt\0"));
}

#[rstest]
fn cat_file_rejects_the_wrong_object_type(init_repository_dir: TempDir) {
    let repository = common::open_repository(init_repository_dir.path());

    let error = repository
        .cat_file(Some(ObjectType::Blob), "HEAD")
        .unwrap_err();

    assert!(matches!(
        common::calp_error(&error),
        CalpError::UnexpectedObjectType { .. }
    ));
}

#[rstest]
fn cat_file_of_a_missing_object_fails(init_repository_dir: TempDir) {
    let missing = "0".repeat(40);

    run_calp_command(init_repository_dir.path(), &["cat-file", "blob", &missing])
        .assert()
        .failure()
        .stderr(predicate::str::contains("object not found"));
}

#[rstest]
fn write_tree_matches_the_committed_tree(init_repository_dir: TempDir) {
    let repository = common::open_repository(init_repository_dir.path());
    let head = repository.refs().read_head().unwrap().unwrap();
    let commit = repository.database().parse_object_as_commit(&head).unwrap();

    let tree_oid = repository.write_tree().expect("write-tree");

    assert_eq!(&tree_oid, commit.tree_oid());
}

#[rstest]
fn hash_object_accepts_paths_from_a_subdirectory(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let nested: PathBuf = init_repository_dir.path().join("a");
    std::fs::write(nested.join("t.txt"), "test\n")?;

    run_calp_command(&nested, &["hash-object", "t.txt"])
        .assert()
        .success()
        .stdout(format!("{TEST_BLOB_OID}\n"));

    Ok(())
}
