use crate::METADATA_DIR;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::errors::CalpError;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Handle on a worktree and its metadata directory
///
/// Holds paths only; every operation reads what it needs from disk.
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    metadata_path: Box<Path>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open the repository whose worktree root is `path`; the metadata directory need
    /// not exist yet
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let path = if path.exists() {
            path.canonicalize()
                .with_context(|| format!("Unable to resolve {}", path.display()))?
        } else {
            path.to_path_buf()
        };
        let metadata_path = path.join(METADATA_DIR);

        Ok(Repository {
            database: Database::new(metadata_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(metadata_path.clone().into_boxed_path()),
            metadata_path: metadata_path.into_boxed_path(),
            path: path.into_boxed_path(),
        })
    }

    /// Walk from `start` up through its ancestors until a metadata directory is found
    pub fn find(start: impl AsRef<Path>) -> anyhow::Result<Self> {
        let start = start.as_ref();
        let start: PathBuf = start
            .canonicalize()
            .with_context(|| format!("Unable to resolve {}", start.display()))?;

        let root = start
            .ancestors()
            .find(|candidate| candidate.join(METADATA_DIR).is_dir())
            .ok_or_else(|| CalpError::RepositoryNotFound(start.clone()))?;

        tracing::debug!(root = %root.display(), "found repository");
        Self::new(root)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    pub fn index_path(&self) -> PathBuf {
        self.metadata_path.join("index")
    }

    /// Read the index from disk
    pub fn load_index(&self) -> anyhow::Result<Index> {
        let mut index = Index::new(self.index_path().into_boxed_path());
        index.rehydrate()?;
        Ok(index)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
