use crate::METADATA_DIR;
use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::errors::CalpError;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Working tree rooted at the repository path
///
/// Paths handed in and out are workspace-relative strings joined with `/`.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn abs_path(&self, file_path: &str) -> PathBuf {
        self.path.join(file_path)
    }

    /// Every file under the worktree, skipping the metadata directory, in name order
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        self.list_files_under("")
    }

    /// Files at or beneath `file_path`; a plain file yields just itself
    pub fn list_files_under(&self, file_path: &str) -> anyhow::Result<Vec<String>> {
        let root = self.path.join(file_path);

        if root.is_file() {
            return Ok(vec![file_path.to_string()]);
        }
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != METADATA_DIR);

        for entry in walker {
            let entry = entry.with_context(|| format!("Unable to scan {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            match self.to_relative(entry.path())? {
                Some(relative) => files.push(relative),
                None => tracing::warn!(
                    path = %entry.path().display(),
                    "file name cannot be tracked, skipping"
                ),
            }
        }

        Ok(files)
    }

    /// None when a component is not UTF-8 or contains a newline
    fn to_relative(&self, path: &Path) -> anyhow::Result<Option<String>> {
        let relative = path
            .strip_prefix(&self.path)
            .with_context(|| format!("{} is outside the worktree", path.display()))?;

        Ok(relative
            .components()
            .map(|component| component.as_os_str().to_str().filter(|s| is_trackable(s)))
            .collect::<Option<Vec<_>>>()
            .map(|segments| segments.join("/")))
    }

    /// Turn a user-supplied path (absolute, or relative to the worktree root) into a
    /// workspace-relative path, rejecting the root itself, `..` and the metadata directory
    pub fn relative_path(&self, path: &Path) -> anyhow::Result<String> {
        let invalid = || CalpError::InvalidPath(path.display().to_string());

        let relative = if path.is_absolute() {
            path.strip_prefix(&self.path).map_err(|_| invalid())?
        } else {
            path
        };

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(segment) => {
                    let segment = segment.to_str().filter(|s| is_trackable(s));
                    segments.push(segment.ok_or_else(invalid)?.to_string())
                }
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid().into());
                }
            }
        }

        match segments.first() {
            None => Err(invalid().into()),
            Some(first) if first == METADATA_DIR => Err(invalid().into()),
            Some(_) => Ok(segments.join("/")),
        }
    }

    pub fn exists(&self, file_path: &str) -> bool {
        self.path.join(file_path).exists()
    }

    pub fn is_file(&self, file_path: &str) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &str) -> anyhow::Result<Bytes> {
        let abs_path = self.path.join(file_path);

        let content = std::fs::read(&abs_path)
            .with_context(|| format!("Unable to read file {}", abs_path.display()))?;

        Ok(content.into())
    }

    pub fn parse_blob(&self, file_path: &str) -> anyhow::Result<Blob> {
        let data = self.read_file(file_path)?;
        Ok(Blob::new(data))
    }

    /// Write `data` at `file_path`, creating parent directories and replacing a directory
    /// that occupies the path
    pub fn write_file(&self, file_path: &str, data: &[u8]) -> anyhow::Result<()> {
        let abs_path = self.path.join(file_path);

        if let Some(parent) = abs_path.parent() {
            self.make_directory(parent)?;
        }
        if abs_path.is_dir() {
            std::fs::remove_dir_all(&abs_path).with_context(|| {
                format!("Failed to remove existing directory: {}", abs_path.display())
            })?;
        }

        std::fs::write(&abs_path, data)
            .with_context(|| format!("Failed to write to file: {}", abs_path.display()))
    }

    /// Remove a file and every directory left empty by its removal
    pub fn remove_file(&self, file_path: &str) -> anyhow::Result<()> {
        let abs_path = self.path.join(file_path);

        if abs_path.is_file() {
            std::fs::remove_file(&abs_path)
                .with_context(|| format!("Failed to remove file: {}", abs_path.display()))?;
        }

        let mut dir = abs_path.parent();
        while let Some(dir_path) = dir {
            if dir_path == self.path.as_ref() || !Self::is_empty_dir(dir_path) {
                break;
            }
            std::fs::remove_dir(dir_path)
                .with_context(|| format!("Failed to remove directory: {}", dir_path.display()))?;
            dir = dir_path.parent();
        }

        Ok(())
    }

    fn is_empty_dir(dir_path: &Path) -> bool {
        std::fs::read_dir(dir_path)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    }

    // Parents are created before children; a file standing where a directory is needed
    // is removed first.
    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        if dir_path.is_dir() {
            return Ok(());
        }

        if let Some(parent) = dir_path.parent() {
            self.make_directory(parent)?;
        }
        if dir_path.is_file() {
            std::fs::remove_file(dir_path)
                .with_context(|| format!("Failed to remove file: {}", dir_path.display()))?;
        }

        std::fs::create_dir(dir_path)
            .with_context(|| format!("Failed to create directory: {}", dir_path.display()))
    }

    // Deletions run first so that a file replaced by a directory (or the reverse) never
    // collides with its replacement.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for (file_path, _) in migration.actions(ActionType::Delete) {
            self.remove_file(file_path)?;
        }

        for action in [ActionType::Modify, ActionType::Add] {
            for (file_path, oid) in migration.actions(action) {
                let blob = migration.load_blob(oid)?;
                self.write_file(file_path, blob.content())?;
            }
        }

        Ok(())
    }
}

// Index lines are newline-terminated
fn is_trackable(segment: &str) -> bool {
    !segment.contains('\n')
}
