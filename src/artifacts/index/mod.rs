//! Staging index entries and the nested path tree built from them
//!
//! ## File Format
//!
//! ```text
//! <40-hex-hash> <path>\n
//! <40-hex-hash> <path>\n
//! ...
//! ```
//!
//! Lines are sorted by path in byte order and every path appears at most once.

pub mod index_entry;
pub mod path_tree;
