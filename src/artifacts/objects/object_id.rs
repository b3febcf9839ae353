//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character lowercase hexadecimal strings. They are computed over
//! `"<type> <len>\0" + body` and uniquely identify blobs, trees and commits.
//!
//! ## Storage
//!
//! Objects are stored in `.calp/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::CalpError;
use std::io;
use std::path::PathBuf;

/// Number of raw bytes in a SHA-1 digest
pub const OBJECT_ID_RAW_LENGTH: usize = OBJECT_ID_LENGTH / 2;

/// Object identifier (SHA-1 hash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Only full 40-character lowercase hashes are accepted; there is no prefix lookup.
    pub fn try_parse(id: String) -> Result<Self, CalpError> {
        if !looks_like_object_hash(&id) {
            return Err(CalpError::InvalidObjectId(id));
        }
        Ok(Self(id))
    }

    /// Build an object ID from a raw SHA-1 digest
    pub fn from_digest(digest: &[u8]) -> Result<Self, CalpError> {
        if digest.len() != OBJECT_ID_RAW_LENGTH {
            return Err(CalpError::InvalidObjectId(format!(
                "digest of {} bytes",
                digest.len()
            )));
        }

        let hex40 = digest.iter().map(|byte| format!("{byte:02x}")).collect();
        Ok(Self(hex40))
    }

    /// Write the object ID in binary format (20 bytes, big-endian)
    ///
    /// Used when encoding tree entries.
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let hex40 = self.as_ref();

        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&hex40[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an object ID from binary format (20 bytes)
    ///
    /// Every byte is rendered as two hex digits, so digests with leading zero bytes keep
    /// their full 40-character form.
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut digest = [0u8; OBJECT_ID_RAW_LENGTH];
        reader.read_exact(&mut digest)?;

        Ok(Self(
            digest.iter().map(|byte| format!("{byte:02x}")).collect(),
        ))
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

/// Whether `candidate` has the shape of a full object hash (40 lowercase hex digits)
///
/// Used to tell hashes apart from branch names; a branch literally named with 40 hex
/// digits is read as a hash.
pub fn looks_like_object_hash(candidate: &str) -> bool {
    candidate.len() == OBJECT_ID_LENGTH
        && candidate
            .bytes()
            .all(|byte| matches!(byte, b'0'..=b'9' | b'a'..=b'f'))
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
