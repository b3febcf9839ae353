use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, HEAD_ALIAS, PARENT_REGEX};
use crate::artifacts::objects::object_id::{ObjectId, looks_like_object_hash};
use crate::errors::CalpError;
use anyhow::Context;

/// Represents a revision specification that can be used to identify commits.
///
/// Supports multiple formats:
/// - Full object hashes: 40 lowercase hexadecimal characters (no prefix lookup)
/// - Branch names and `HEAD`: `master`, `feature/new-feature`
/// - Aliases: `@` (resolves to `HEAD`)
/// - Parent notation: `<revision>^` (e.g., `master^`, `HEAD^`)
/// - Ancestor notation: `<revision>~<n>` (e.g., `master~3`, `HEAD~5`)
///
/// A string shaped like a full hash is always read as a hash, even if a branch with the
/// same name exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    /// A literal object hash
    Hash(ObjectId),
    /// A branch name or `HEAD`
    Ref(BranchName),
    /// The Nth ancestor of a revision (e.g., HEAD~3)
    Ancestor(Box<Revision>, usize),
    /// The parent of a revision (e.g., HEAD^)
    Parent(Box<Revision>),
}

impl Revision {
    /// Resolve to an object hash; the object itself is not loaded unless parents are walked
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Hash(oid) => Ok(oid.clone()),
            Revision::Ref(name) if name.as_ref() == HEAD_REF_NAME => repository
                .refs()
                .read_head()?
                .ok_or_else(|| CalpError::UnbornHead.into()),
            Revision::Ref(name) => repository
                .refs()
                .read_branch(name)?
                .ok_or_else(|| CalpError::RevisionNotFound(name.to_string()).into()),
            Revision::Parent(base) => {
                let oid = base.resolve(repository)?;
                Self::resolve_commit_parent(&oid, repository)?
                    .ok_or_else(|| CalpError::RevisionNotFound(self.to_string()).into())
            }
            Revision::Ancestor(base, generations) => {
                let mut oid = base.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::resolve_commit_parent(&oid, repository)?
                        .ok_or_else(|| CalpError::RevisionNotFound(self.to_string()))?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_commit_parent(
        oid: &ObjectId,
        repository: &Repository,
    ) -> anyhow::Result<Option<ObjectId>> {
        let commit = repository.database().parse_object_as_commit(oid)?;
        Ok(commit.parent().cloned())
    }

    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let parent_regex = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        let ancestor_regex = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;

        if let Some(caps) = parent_regex.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ancestor_regex.captures(revision) {
            let generations: usize = caps[2]
                .parse()
                .with_context(|| format!("failed to parse generations in revision: {revision}"))?;
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else if looks_like_object_hash(revision) {
            Ok(Revision::Hash(ObjectId::try_parse(revision.to_string())?))
        } else if revision == HEAD_ALIAS {
            Ok(Revision::Ref(BranchName::try_parse(HEAD_REF_NAME.to_string())?))
        } else {
            Ok(Revision::Ref(BranchName::try_parse(revision.to_string())?))
        }
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::Hash(oid) => write!(f, "{oid}"),
            Revision::Ref(name) => write!(f, "{name}"),
            Revision::Ancestor(base, generations) => write!(f, "{base}~{generations}"),
            Revision::Parent(base) => write!(f, "{base}^"),
        }
    }
}
