//! Data structures and algorithms shared by the areas and commands
//!
//! - `branch`: Branch names and revision parsing
//! - `checkout`: Working tree migration planning
//! - `diff`: Changes a commit introduces relative to its parent
//! - `graph`: Commit ancestry, lowest common ancestor
//! - `index`: Index entries and the path tree built from them
//! - `objects`: Object types (blob, tree, commit) and their codec
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod diff;
pub mod graph;
pub mod index;
pub mod objects;
pub mod status;
