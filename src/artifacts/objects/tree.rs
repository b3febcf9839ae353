//! Tree object
//!
//! A tree describes one directory level. Subdirectories are not nested inline: a
//! directory entry points at the hash of another tree object.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Entries are encoded in their stored order; the encoder never re-sorts them.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::CalpError;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Mode of a tree entry; file permissions beyond the default are not tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryMode {
    Regular,
    Directory,
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::Regular => "100644",
            EntryMode::Directory => "40000",
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// Kind of object an entry with this mode points at
    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryMode::Regular => ObjectType::Blob,
            EntryMode::Directory => ObjectType::Tree,
        }
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = CalpError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "100644" => Ok(EntryMode::Regular),
            "40000" => Ok(EntryMode::Directory),
            _ => Err(malformed(format!("unsupported entry mode {value:?}"))),
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: EntryMode,
    /// Single path component, never containing a separator
    pub name: String,
    pub oid: ObjectId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = TreeEntry> {
        self.entries.into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn malformed(reason: impl Into<String>) -> CalpError {
    CalpError::MalformedObject {
        kind: "tree",
        reason: reason.into(),
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();

        for entry in &self.entries {
            write!(content_bytes, "{} {}", entry.mode.as_str(), entry.name)?;
            content_bytes.push(0);
            entry.oid.write_h40_to(&mut content_bytes)?;
        }

        Ok(Bytes::from(content_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = Vec::new();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(malformed("unexpected end of input in entry mode").into());
            }

            let mode_str =
                std::str::from_utf8(&mode_bytes).map_err(|_| malformed("non-ASCII entry mode"))?;
            let mode = EntryMode::try_from(mode_str)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(malformed("missing NUL after entry name").into());
            }
            let name = String::from_utf8(name_bytes.clone())
                .map_err(|_| malformed("entry name is not valid UTF-8"))?;

            let oid = ObjectId::read_h40_from(&mut reader)
                .map_err(|_| malformed(format!("truncated hash for entry {name:?}")))?;

            entries.push(TreeEntry::new(mode, name, oid));
        }

        Ok(Tree::new(entries))
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn encodes_entries_in_stored_order() -> anyhow::Result<()> {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "main.txt".into(), oid('b')),
            TreeEntry::new(EntryMode::Directory, "A".into(), oid('a')),
        ]);

        let encoded = tree.serialize()?;

        let mut expected = b"100644 main.txt\0".to_vec();
        expected.extend([0xbb; 20]);
        expected.extend(b"40000 A\0");
        expected.extend([0xaa; 20]);
        assert_eq!(encoded.to_vec(), expected);

        let decoded = Tree::deserialize(Cursor::new(encoded))?;
        assert_eq!(decoded, tree);

        Ok(())
    }

    #[test]
    fn empty_body_is_an_empty_tree() {
        let tree = Tree::deserialize(Cursor::new(Bytes::new())).unwrap();
        assert!(tree.is_empty());
    }

    #[rstest]
    #[case::zero_padded_directory(b"040000".as_slice())]
    #[case::executable(b"100755".as_slice())]
    #[case::symlink(b"120000".as_slice())]
    fn modes_that_cannot_be_re_encoded_are_malformed(#[case] mode: &[u8]) {
        let mut body = mode.to_vec();
        body.extend(b" A\0");
        body.extend([0x11; 20]);

        let error = Tree::deserialize(Cursor::new(body)).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<CalpError>(),
            Some(CalpError::MalformedObject { kind: "tree", .. })
        ));
    }

    #[test]
    fn missing_nul_is_malformed() {
        let error = Tree::deserialize(Cursor::new(b"100644 file.txt".to_vec())).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<CalpError>(),
            Some(CalpError::MalformedObject { kind: "tree", .. })
        ));
    }

    #[test]
    fn short_hash_is_malformed() {
        let mut body = b"100644 file.txt\0".to_vec();
        body.extend([0x11; 19]);

        let error = Tree::deserialize(Cursor::new(body)).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<CalpError>(),
            Some(CalpError::MalformedObject { kind: "tree", .. })
        ));
    }
}
