//! Command implementations
//!
//! Every command is an `impl Repository` block in its own file:
//!
//! - `plumbing`: object-level building blocks (hash-object, cat-file, ls-tree, write-tree, commit-tree)
//! - `porcelain`: user workflows (init, add, status, commit, checkout, cherry-pick, rebase, log)

pub mod plumbing;
pub mod porcelain;
