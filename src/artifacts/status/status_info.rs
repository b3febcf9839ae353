use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use derive_new::new;
use std::collections::HashSet;

/// Pending changes of the working tree against the index
///
/// `modified` and `untracked` follow the workspace scan order; `deleted` follows index
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
    pub deleted: Vec<String>,
}

impl StatusInfo {
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.untracked.is_empty() && self.deleted.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let workspace = self.repository.workspace();
        let database = self.repository.database();

        let mut status = StatusInfo::default();
        let mut workspace_hashes = HashSet::<ObjectId>::new();

        for file_path in workspace.list_files()? {
            let content = workspace.read_file(&file_path)?;
            let oid = database.hash_and_maybe_write(ObjectType::Blob, &content, false)?;

            match index.entry_by_path(&file_path) {
                Some(entry) if entry.oid != oid => status.modified.push(file_path),
                Some(_) => {}
                None => status.untracked.push(file_path),
            }

            workspace_hashes.insert(oid);
        }

        // an entry only counts as deleted if its content is gone from the whole worktree
        status.deleted = index
            .entries()
            .filter(|entry| !workspace_hashes.contains(&entry.oid))
            .filter(|entry| !status.modified.contains(&entry.path))
            .map(|entry| entry.path.clone())
            .collect();

        tracing::debug!(
            modified = status.modified.len(),
            untracked = status.untracked.len(),
            deleted = status.deleted.len(),
            "computed status"
        );

        Ok(status)
    }
}
