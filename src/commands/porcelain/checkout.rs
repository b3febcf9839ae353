use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::CalpError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// A new branch was created at HEAD and checked out
    Created(BranchName),
    /// HEAD moved to an existing branch and the working tree followed
    Switched(BranchName),
    /// The branch was already checked out; nothing changed
    AlreadyOn(BranchName),
}

impl Repository {
    /// Switch to `target`, creating it at the current commit first when `is_new_branch`
    ///
    /// Switching to an existing branch requires a clean working tree. Failures leave
    /// HEAD, the index and the working tree untouched.
    pub fn checkout(&self, target: &str, is_new_branch: bool) -> anyhow::Result<CheckoutOutcome> {
        let branch_name = BranchName::try_parse(target.to_string())?;

        if is_new_branch {
            return self.checkout_new_branch(branch_name);
        }

        if !self.refs().branch_exists(&branch_name) {
            return Err(CalpError::BranchNotFound(branch_name.to_string()).into());
        }
        if self.refs().current_ref()? == SymRefName::from(&branch_name) {
            return Ok(CheckoutOutcome::AlreadyOn(branch_name));
        }

        self.require_clean()?;

        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or_else(|| CalpError::BranchNotFound(branch_name.to_string()))?;

        self.materialize_commit(&target_oid)?;
        self.refs().set_head(&branch_name)?;

        tracing::info!(branch = %branch_name, oid = %target_oid, "switched branch");

        Ok(CheckoutOutcome::Switched(branch_name))
    }

    fn checkout_new_branch(&self, branch_name: BranchName) -> anyhow::Result<CheckoutOutcome> {
        if self.refs().branch_exists(&branch_name) {
            return Err(CalpError::BranchAlreadyExists(branch_name.to_string()).into());
        }

        // on an unborn HEAD only HEAD moves; the branch file comes with the first commit
        match self.refs().read_head()? {
            Some(head_oid) => self.refs().create_branch(&branch_name, &head_oid)?,
            None => tracing::debug!(branch = %branch_name, "HEAD is unborn, not creating a branch file"),
        }
        self.refs().set_head(&branch_name)?;

        tracing::info!(branch = %branch_name, "created branch");

        Ok(CheckoutOutcome::Created(branch_name))
    }

    /// Rewrite the working tree and the index to match the tree of `commit_oid`
    pub(crate) fn materialize_commit(&self, commit_oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self.database().parse_object_as_commit(commit_oid)?;
        let target = self.database().flatten_tree(commit.tree_oid())?;

        let mut index = self.load_index()?;
        let migration = Migration::plan(
            self.database(),
            index.entries().map(|entry| (entry.path.as_str(), &entry.oid)),
            &target,
        );
        self.workspace().apply_migration(&migration)?;

        index.replace_all(
            target
                .into_iter()
                .map(|(path, oid)| IndexEntry::new(path, oid)),
        );
        index.write_updates()
    }
}
