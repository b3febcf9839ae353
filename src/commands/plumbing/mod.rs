//! Plumbing commands (low-level operations)
//!
//! Plumbing commands provide direct access to the object database. They're primarily
//! used for scripting and as building blocks for porcelain commands.
//!
//! ## Commands
//!
//! - `hash-object`: Compute object ID and optionally store in database
//! - `cat-file`: Print the body of an object
//! - `ls-tree`: List contents of a tree object
//! - `write-tree`: Store the index as tree objects
//! - `commit-tree`: Store a commit object for a tree

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod ls_tree;
pub mod write_tree;
