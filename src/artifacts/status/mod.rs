//! Working tree status inspection
//!
//! Compares the files of the working tree against the index. Every file is hashed as a
//! blob without being stored and classified as modified, untracked, or clean; index
//! entries whose content no longer appears anywhere in the tree are reported as deleted.

pub mod status_info;
