//! References (branches and HEAD)
//!
//! References are human-readable names pointing to commits. They can be:
//! - Direct: containing a commit hash
//! - Symbolic: pointing to another reference (e.g., HEAD -> refs/heads/master)
//!
//! ## File Format
//!
//! References are stored as text files containing either:
//! - A 40-character hash (direct reference)
//! - `ref: <path>` for symbolic references
//!
//! Branch files under `refs/heads/` are always direct; HEAD is normally symbolic.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::CalpError;
use anyhow::Context;
use derive_new::new;
use std::path::Path;

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.calp`)
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Most symbolic hops followed before a chain is treated as a loop
const MAX_SYMREF_DEPTH: usize = 5;

/// Parsed content of a reference file
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { sym_ref_name: SymRefName },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {}", path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Resolve a reference to a commit hash, following symbolic references
    ///
    /// # Returns
    ///
    /// None when the chain ends at a missing file (e.g. the branch of an unborn HEAD)
    pub fn resolve(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        let (_, target) = self.follow(sym_ref_name)?;
        Ok(target)
    }

    /// Follow symbolic refs from `start`, returning the last ref reached and the hash it
    /// holds, if any
    fn follow(&self, start: &SymRefName) -> anyhow::Result<(SymRefName, Option<ObjectId>)> {
        let mut current = start.clone();

        for _ in 0..=MAX_SYMREF_DEPTH {
            match SymRefOrOid::read_symref_or_oid(&self.path.join(current.as_ref_path()))? {
                Some(SymRefOrOid::SymRef { sym_ref_name }) => current = sym_ref_name,
                Some(SymRefOrOid::Oid(oid)) => return Ok((current, Some(oid))),
                None => return Ok((current, None)),
            }
        }

        Err(CalpError::SymRefTooDeep(start.as_ref_path().to_string()).into())
    }

    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.resolve(&SymRefName::head())
    }

    /// Get the reference that a chain starting at HEAD finally lands on
    ///
    /// If HEAD points to refs/heads/main, returns refs/heads/main; a detached HEAD
    /// returns HEAD itself.
    pub fn current_ref(&self) -> anyhow::Result<SymRefName> {
        let (current, _) = self.follow(&SymRefName::head())?;
        Ok(current)
    }

    /// Name of the branch HEAD points at
    pub fn current_branch_name(&self) -> anyhow::Result<BranchName> {
        let current_ref = self.current_ref()?;

        if current_ref.is_detached_head() {
            return Err(CalpError::DetachedHead.into());
        }

        BranchName::try_parse_sym_ref_name(&current_ref)
    }

    /// Advance whatever HEAD stands for: the branch it points at, or HEAD itself when detached
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let current_ref = self.current_ref()?;
        tracing::debug!(reference = current_ref.as_ref_path(), %oid, "updating ref");

        self.update_ref_file(&self.path.join(current_ref.as_ref_path()), oid.as_ref())
    }

    /// Point HEAD symbolically at a branch
    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        let target = SymRefName::from(branch_name);
        tracing::debug!(target = target.as_ref_path(), "repointing HEAD");

        self.update_ref_file(
            &self.head_path(),
            &format!("ref: {}", target.as_ref_path()),
        )
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        self.resolve(&SymRefName::from(branch_name))
    }

    pub fn update_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        tracing::debug!(branch = %branch_name, %oid, "updating branch");
        self.update_ref_file(&self.branch_path(branch_name), oid.as_ref())
    }

    pub fn create_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(branch_name) {
            return Err(CalpError::BranchAlreadyExists(branch_name.to_string()).into());
        }

        self.update_branch(branch_name, oid)
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("invalid ref file path {}", path.display())
        })?)?;

        std::fs::write(path, raw_ref)
            .with_context(|| format!("failed to write ref file at {}", path.display()))
    }

    fn branch_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.path
            .join(SymRefName::from(branch_name).as_ref_path())
            .into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }
}
