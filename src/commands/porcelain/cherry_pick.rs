use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::diff::tree_diff::{FlatTree, introduced_changes};
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;

impl Repository {
    /// `(path, blob)` pairs a commit adds or changes relative to its parent
    pub fn commit_changes(&self, commit_oid: &ObjectId) -> anyhow::Result<FlatTree> {
        let commit = self.database().parse_object_as_commit(commit_oid)?;
        let new = self.database().flatten_tree(commit.tree_oid())?;

        let old = match commit.parent() {
            Some(parent) => {
                let parent = self.database().parse_object_as_commit(parent)?;
                self.database().flatten_tree(parent.tree_oid())?
            }
            None => Vec::new(),
        };

        Ok(introduced_changes(&old, &new))
    }

    /// Apply the changes of one commit on top of HEAD as a new commit with the same message
    ///
    /// Picked files overwrite the working tree unconditionally; there is no conflict
    /// detection. Returns None if HEAD already had every picked change.
    pub fn cherry_pick(&self, commit_ref: &str) -> anyhow::Result<Option<ObjectId>> {
        let commit_oid = Revision::try_parse(commit_ref)?.resolve(self)?;
        self.cherry_pick_commit(&commit_oid)
    }

    pub(crate) fn cherry_pick_commit(&self, commit_oid: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let commit = self.database().parse_object_as_commit(commit_oid)?;
        self.require_clean()?;

        let changes = self.commit_changes(commit_oid)?;
        let mut index = self.load_index()?;

        for (path, oid) in changes {
            if !self.workspace_matches(&path, &oid)? {
                let blob = self.database().parse_object_as_blob(&oid)?;
                self.workspace().write_file(&path, blob.content())?;
            }

            index.add(IndexEntry::new(path, oid));
        }
        index.write_updates()?;

        tracing::info!(picked = %commit_oid, "applied commit changes");

        self.commit(&commit.message())
    }

    fn workspace_matches(&self, path: &str, oid: &ObjectId) -> anyhow::Result<bool> {
        if !self.workspace().is_file(path) {
            return Ok(false);
        }

        let content = self.workspace().read_file(path)?;
        let current = self
            .database()
            .hash_and_maybe_write(ObjectType::Blob, &content, false)?;

        Ok(&current == oid)
    }
}
