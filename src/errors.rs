//! Error types raised by repository operations.
//!
//! Operations return `anyhow::Result`; the failures a caller may want to react to are
//! raised as [`CalpError`] and can be recovered with `error.downcast_ref::<CalpError>()`.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::status_info::StatusInfo;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalpError {
    /// No metadata directory between the start path and the filesystem root.
    #[error("not a calp repository (or any of the parent directories): {}", .0.display())]
    RepositoryNotFound(PathBuf),

    #[error("repository already exists at {}", .0.display())]
    RepositoryAlreadyExists(PathBuf),

    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    /// The object body does not follow the encoding of its kind.
    #[error("malformed {kind} object: {reason}")]
    MalformedObject { kind: &'static str, reason: String },

    /// The stored bytes disagree with their own header.
    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: ObjectId, reason: String },

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("object {oid} is a {actual}, not a {expected}")]
    UnexpectedObjectType {
        oid: ObjectId,
        expected: String,
        actual: String,
    },

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("malformed index line {line}: {reason}")]
    MalformedIndex { line: usize, reason: String },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The working tree has pending changes; the status that blocked the operation is attached.
    #[error("your local changes would be overwritten, commit them first")]
    UncommittedChanges(StatusInfo),

    #[error("branch '{0}' already exists")]
    BranchAlreadyExists(String),

    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("symbolic ref chain starting at {0} is too deep or loops")]
    SymRefTooDeep(String),

    #[error("HEAD is detached, not on any branch")]
    DetachedHead,

    #[error("HEAD does not point at any commit yet")]
    UnbornHead,

    #[error("revision '{0}' could not be resolved")]
    RevisionNotFound(String),

    #[error("commits {0} and {1} share no history")]
    NoCommonAncestor(ObjectId, ObjectId),
}
