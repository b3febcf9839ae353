//! Object types and their canonical encodings
//!
//! All content is stored as objects identified by SHA-1 hashes. There are three kinds:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: One directory level (modes, names, and object IDs)
//! - **Commit**: Snapshot with metadata (tree, parent, author, committer, message)
//!
//! The codec only deals with object bodies. Framing with `<type> <size>\0`, hashing and
//! compression belong to the object database.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
