use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// History from HEAD along first parents, newest first; empty on an unborn HEAD
    pub fn log(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut history = Vec::new();
        let mut next = self.refs().read_head()?;

        while let Some(oid) = next {
            let commit = self.database().parse_object_as_commit(&oid)?;
            next = commit.parent().cloned();
            history.push((oid, commit));
        }

        Ok(history)
    }
}
