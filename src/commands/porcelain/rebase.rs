use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::CalpError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebaseOutcome {
    /// The current branch has no commits the target lacks
    UpToDate,
    Rebased {
        /// Commit the branch was replayed onto
        onto: ObjectId,
        /// New tip of the current branch
        head: ObjectId,
        /// Commits created by the replay, oldest first
        replayed: Vec<ObjectId>,
    },
}

impl Repository {
    /// Replay the commits of the current branch since it diverged from `target_ref` on
    /// top of `target_ref`
    ///
    /// The current branch ends up at the last replayed commit and stays checked out; the
    /// target branch does not move.
    pub fn rebase(&self, target_ref: &str) -> anyhow::Result<RebaseOutcome> {
        let current_branch = self.refs().current_branch_name()?;
        let head_oid = self.refs().read_head()?.ok_or(CalpError::UnbornHead)?;

        let target_branch = BranchName::try_parse(target_ref.to_string())?;
        let target_oid = self
            .refs()
            .read_branch(&target_branch)?
            .ok_or_else(|| CalpError::BranchNotFound(target_branch.to_string()))?;

        let graph = CommitGraph::new(|oid| {
            Ok(self.database().parse_object_as_commit(oid)?.parents().to_vec())
        });

        // [head, ..., lca] becomes the oldest-first list of commits to replay
        let mut to_replay = graph.path_to_lca(&target_oid, &head_oid)?;
        to_replay.reverse();
        to_replay.remove(0);

        if to_replay.is_empty() {
            tracing::info!(branch = %current_branch, onto = %target_branch, "nothing to rebase");
            return Ok(RebaseOutcome::UpToDate);
        }

        self.require_clean()?;
        self.checkout(target_branch.as_ref(), false)?;

        let mut head = target_oid.clone();
        let mut replayed = Vec::new();
        for commit_oid in &to_replay {
            tracing::debug!(commit = %commit_oid, "replaying");
            if let Some(new_oid) = self.cherry_pick_commit(commit_oid)? {
                head = new_oid.clone();
                replayed.push(new_oid);
            }
        }

        // the replay advanced the target branch; hand the commits to the rebased branch
        self.refs().update_branch(&target_branch, &target_oid)?;
        self.refs().update_branch(&current_branch, &head)?;
        self.refs().set_head(&current_branch)?;

        tracing::info!(
            branch = %current_branch,
            onto = %target_oid,
            head = %head,
            replayed = replayed.len(),
            "rebased"
        );

        Ok(RebaseOutcome::Rebased {
            onto: target_oid,
            head,
            replayed,
        })
    }
}
