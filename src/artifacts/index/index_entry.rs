//! Index entry representation
//!
//! Each entry maps a workspace-relative path (always `/`-separated) to the hash of the
//! blob staged for it. On disk an entry is one line: `<40-hex-hash> <path>`.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::CalpError;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to repository root
    pub path: String,
    /// Hash of the staged blob
    pub oid: ObjectId,
}

impl IndexEntry {
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Every proper ancestor directory of the entry, outermost first
    ///
    /// `a/b/c.txt` yields `["a", "a/b"]`.
    pub fn parent_dirs(&self) -> Vec<&str> {
        self.path
            .match_indices('/')
            .map(|(separator, _)| &self.path[..separator])
            .collect()
    }

    pub fn to_line(&self) -> String {
        format!("{} {}", self.oid, self.path)
    }

    /// Parse one line of the index file; `line_number` is 1-based and only used for errors
    pub fn parse_line(line_number: usize, line: &str) -> Result<Self, CalpError> {
        let malformed = |reason: &str| CalpError::MalformedIndex {
            line: line_number,
            reason: reason.to_string(),
        };

        let (hash, path) = line
            .split_once(' ')
            .ok_or_else(|| malformed("expected '<hash> <path>'"))?;
        let oid = ObjectId::try_parse(hash.to_string())
            .map_err(|_| malformed("invalid object hash"))?;

        if path.is_empty() {
            return Err(malformed("empty path"));
        }

        Ok(IndexEntry::new(path.to_string(), oid))
    }
}
