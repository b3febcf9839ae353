//! calp: a small content-addressed version-control engine
//!
//! The crate is split the same way a repository is laid out on disk:
//!
//! - `areas`: the stateful parts of a repository (object database, index, refs, workspace)
//! - `artifacts`: the data structures and algorithms that flow between areas
//! - `commands`: plumbing and porcelain operations, implemented on `Repository`
//!
//! Every operation returns plain data; formatting and printing are left to the binary.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

/// Name of the hidden metadata directory at the root of a worktree
pub const METADATA_DIR: &str = ".calp";

/// Branch HEAD points at after `init`
pub const DEFAULT_BRANCH: &str = "master";
