use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Commit the index on top of HEAD and advance the current reference
    ///
    /// # Returns
    ///
    /// None when the index tree equals the tree of HEAD ("nothing to commit")
    pub fn commit(&self, message: &str) -> anyhow::Result<Option<ObjectId>> {
        let tree_oid = self.write_tree()?;
        let parent = self.refs().read_head()?;

        if let Some(parent) = &parent {
            let parent_commit = self.database().parse_object_as_commit(parent)?;
            if parent_commit.tree_oid() == &tree_oid {
                tracing::info!(%parent, "nothing to commit");
                return Ok(None);
            }
        }

        let commit_oid = self.commit_tree(&tree_oid, parent, message)?;
        self.refs().update_head(&commit_oid)?;

        tracing::info!(oid = %commit_oid, tree = %tree_oid, "created commit");

        Ok(Some(commit_oid))
    }
}
