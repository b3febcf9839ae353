use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;

/// Stored form of a commit message: trailing whitespace dropped, one newline appended
pub fn normalize_message(message: &str) -> String {
    format!("{}\n", message.trim_end())
}

impl Repository {
    /// Store a commit for `tree_oid` on top of `parent`, without moving any reference
    pub fn commit_tree(
        &self,
        tree_oid: &ObjectId,
        parent: Option<ObjectId>,
        message: &str,
    ) -> anyhow::Result<ObjectId> {
        // both ends must be the right kind of object
        self.database().parse_object_as_tree(tree_oid)?;
        if let Some(parent) = &parent {
            self.database().parse_object_as_commit(parent)?;
        }

        let author = Author::load_from_env();
        let commit = Commit::new(
            parent,
            tree_oid.clone(),
            author,
            normalize_message(message),
        );

        self.database().store(&commit)
    }
}
