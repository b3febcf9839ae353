use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use std::path::PathBuf;

impl Repository {
    /// Stage files
    ///
    /// Each path is absolute or relative to the worktree root. A directory stages every
    /// file beneath it; a tracked path that no longer exists is unstaged. All paths are
    /// validated before the index is touched.
    pub fn add(&self, paths: &[PathBuf]) -> anyhow::Result<()> {
        let paths = paths
            .iter()
            .map(|path| self.workspace().relative_path(path))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut index = self.load_index()?;

        for path in paths {
            if !self.workspace().exists(&path) {
                let tracked = index.entries_under_path(&path);
                if tracked.is_empty() {
                    tracing::warn!(path, "path does not exist and is not tracked, ignoring");
                }
                for tracked in tracked {
                    tracing::debug!(path = tracked, "unstaging deleted path");
                    index.remove(&tracked);
                }
                continue;
            }

            let files = self.workspace().list_files_under(&path)?;

            // tracked files that vanished from a directory being added
            for tracked in index.entries_under_path(&path) {
                if !files.contains(&tracked) {
                    index.remove(&tracked);
                }
            }

            for file in files {
                let blob = self.workspace().parse_blob(&file)?;
                let blob_id = self.database().store(&blob)?;

                index.add(IndexEntry::new(file, blob_id));
            }
        }

        if index.has_changed() {
            index.write_updates()?;
        }

        Ok(())
    }
}
