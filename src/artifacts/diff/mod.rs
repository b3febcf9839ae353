//! Path-level differences between flattened trees
//!
//! Content is compared by blob hash only; there is no line diffing.

pub mod tree_diff;
