use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::CalpError;
use crate::{DEFAULT_BRANCH, METADATA_DIR};
use anyhow::Context;
use std::fs;
use std::path::Path;

impl Repository {
    /// Create an empty repository at `path`, creating the directory if needed
    ///
    /// HEAD points at the default branch; the branch file itself appears with the
    /// first commit.
    pub fn init(path: impl AsRef<Path>) -> anyhow::Result<Repository> {
        let path = path.as_ref();

        if path.join(METADATA_DIR).exists() {
            return Err(CalpError::RepositoryAlreadyExists(path.to_path_buf()).into());
        }

        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
        let repository = Repository::new(path)?;

        fs::create_dir_all(repository.database().objects_path())
            .context("Failed to create objects directory")?;
        fs::create_dir_all(repository.refs().heads_path())
            .context("Failed to create refs/heads directory")?;
        fs::create_dir_all(repository.refs().tags_path())
            .context("Failed to create refs/tags directory")?;

        repository
            .refs()
            .set_head(&BranchName::try_parse(DEFAULT_BRANCH.to_string())?)
            .context("Failed to create initial HEAD reference")?;

        tracing::info!(path = %repository.path().display(), "initialized empty repository");

        Ok(repository)
    }
}
