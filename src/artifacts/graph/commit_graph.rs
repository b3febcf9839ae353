//! Ancestor sets and common-ancestor paths over the commit graph
//!
//! The graph is never materialized: parents are pulled on demand through a loader
//! function, so the same algorithms run against the object database or an in-memory
//! store in tests.
//!
//! History is a chain of single-parent commits. `ancestors` still unions over every
//! parent a commit lists, while `path_to_lca` follows first parents only.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let graph = CommitGraph::new(|oid| {
//!     Ok(database.parse_object_as_commit(oid)?.parents().to_vec())
//! });
//!
//! // [head, ..., lca]
//! let path = graph.path_to_lca(&target, &head)?;
//! ```

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::CalpError;
use std::collections::HashSet;

pub struct CommitGraph<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    parents_loader: ParentsLoaderFn,
}

impl<ParentsLoaderFn> CommitGraph<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    /// Creates a graph over the given parent loader
    ///
    /// The loader returns the parent ids of a commit, empty for a root commit.
    pub fn new(parents_loader: ParentsLoaderFn) -> Self {
        Self { parents_loader }
    }

    /// Every commit reachable from `commit` through parent links, excluding `commit`
    pub fn ancestors(&self, commit: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        let mut ancestors = HashSet::new();
        let mut pending = (self.parents_loader)(commit)?;

        while let Some(oid) = pending.pop() {
            if ancestors.insert(oid.clone()) {
                pending.extend((self.parents_loader)(&oid)?);
            }
        }

        Ok(ancestors)
    }

    /// Walk first parents back from `commit_b` until reaching a commit that `commit_a`
    /// already contains (`commit_a` itself or one of its ancestors)
    ///
    /// # Returns
    ///
    /// The visited commits in traversal order: `commit_b` first, the common ancestor last.
    /// If `commit_b` is already contained in `commit_a` the path is just `[commit_b]`.
    ///
    /// # Errors
    ///
    /// `NoCommonAncestor` when the walk reaches a root commit without meeting `commit_a`'s
    /// history.
    pub fn path_to_lca(
        &self,
        commit_a: &ObjectId,
        commit_b: &ObjectId,
    ) -> anyhow::Result<Vec<ObjectId>> {
        let mut reachable_from_a = self.ancestors(commit_a)?;
        reachable_from_a.insert(commit_a.clone());

        let mut path = Vec::new();
        let mut cursor = commit_b.clone();

        loop {
            path.push(cursor.clone());

            if reachable_from_a.contains(&cursor) {
                tracing::debug!(lca = %cursor, steps = path.len(), "found common ancestor");
                return Ok(path);
            }

            cursor = (self.parents_loader)(&cursor)?
                .into_iter()
                .next()
                .ok_or_else(|| CalpError::NoCommonAncestor(commit_a.clone(), commit_b.clone()))?;
        }
    }

    /// Lowest common ancestor of two commits
    pub fn lca(&self, commit_a: &ObjectId, commit_b: &ObjectId) -> anyhow::Result<ObjectId> {
        let path = self.path_to_lca(commit_a, commit_b)?;

        path.last()
            .cloned()
            .ok_or_else(|| CalpError::NoCommonAncestor(commit_a.clone(), commit_b.clone()).into())
    }
}
