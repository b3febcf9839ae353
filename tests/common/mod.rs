#![allow(dead_code)]

pub mod command;
pub mod file;

use calp::areas::repository::Repository;
use calp::errors::CalpError;
use std::path::Path;

/// Open the repository rooted at `dir` through the library API
pub fn open_repository(dir: &Path) -> Repository {
    Repository::find(dir).expect("Failed to open repository")
}

/// The typed error behind an operation failure
pub fn calp_error(error: &anyhow::Error) -> &CalpError {
    error
        .downcast_ref::<CalpError>()
        .unwrap_or_else(|| panic!("expected a CalpError, got: {error:#}"))
}

/// Content of a file inside the metadata directory
pub fn read_metadata_file(dir: &Path, name: &str) -> String {
    let path = dir.join(calp::METADATA_DIR).join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}
