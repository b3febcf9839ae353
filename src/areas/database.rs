//! Object database
//!
//! Objects are framed as `<type> <size>\0<body>`, hashed with SHA-1, zlib-compressed and
//! stored at `objects/<first 2 hex chars>/<remaining 38 hex chars>`. Objects are
//! write-once: a hash path that already exists is never rewritten nor re-verified.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable, hash_object_body};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::CalpError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Hash `body` as an object of `object_type`, persisting it only when `persist` is set
    pub fn hash_and_maybe_write(
        &self,
        object_type: ObjectType,
        body: &[u8],
        persist: bool,
    ) -> anyhow::Result<ObjectId> {
        let object_id = hash_object_body(object_type, body)?;

        if persist {
            let object_path = self.path.join(object_id.to_path());

            // write the object to disk unless it already exists
            if object_path.exists() {
                tracing::debug!(oid = %object_id, "object already stored, skipping write");
            } else {
                std::fs::create_dir_all(
                    object_path
                        .parent()
                        .context(format!("Invalid object path {}", object_path.display()))?,
                )
                .context(format!(
                    "Unable to create object directory {}",
                    object_path.display()
                ))?;

                let mut framed = object_type.header(body.len()).into_bytes();
                framed.extend_from_slice(body);
                self.write_object(object_path, framed.into())?;

                tracing::debug!(oid = %object_id, kind = %object_type, size = body.len(), "stored object");
            }
        }

        Ok(object_id)
    }

    /// Encode and persist an object, returning its hash
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let body = object.serialize()?;
        self.hash_and_maybe_write(object.object_type(), &body, true)
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Read an object's kind and body, validating the stored header against the body
    pub fn read(&self, object_id: &ObjectId) -> anyhow::Result<(ObjectType, Bytes)> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.is_file() {
            return Err(CalpError::ObjectNotFound(object_id.clone()).into());
        }

        let object_content = self.read_object(object_path)?;
        let corrupt = |reason: String| CalpError::CorruptObject {
            oid: object_id.clone(),
            reason,
        };

        let header_end = object_content
            .iter()
            .position(|&byte| byte == 0)
            .ok_or_else(|| corrupt("missing header terminator".to_string()))?;
        let header = std::str::from_utf8(&object_content[..header_end])
            .map_err(|_| corrupt("header is not valid UTF-8".to_string()))?;
        let (type_token, declared_len) = header
            .split_once(' ')
            .ok_or_else(|| corrupt(format!("malformed header {header:?}")))?;

        let object_type = ObjectType::try_from(type_token)?;
        let declared_len: usize = declared_len
            .parse()
            .map_err(|_| corrupt(format!("malformed length in header {header:?}")))?;

        let body = object_content.slice(header_end + 1..);
        if body.len() != declared_len {
            return Err(corrupt(format!(
                "header declares {declared_len} bytes but body has {}",
                body.len()
            ))
            .into());
        }

        Ok((object_type, body))
    }

    pub fn object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.read(object_id)?;
        Ok(object_type)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, body) = self.read(object_id)?;
        ObjectBox::decode(object_type, body)
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let body = self.read_expecting(object_id, ObjectType::Blob)?;
        Blob::deserialize(Cursor::new(body))
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        let body = self.read_expecting(object_id, ObjectType::Tree)?;
        Tree::deserialize(Cursor::new(body))
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let body = self.read_expecting(object_id, ObjectType::Commit)?;
        Commit::deserialize(Cursor::new(body))
    }

    fn read_expecting(&self, object_id: &ObjectId, expected: ObjectType) -> anyhow::Result<Bytes> {
        let (object_type, body) = self.read(object_id)?;

        if object_type != expected {
            return Err(CalpError::UnexpectedObjectType {
                oid: object_id.clone(),
                expected: expected.to_string(),
                actual: object_type.to_string(),
            }
            .into());
        }

        Ok(body)
    }

    /// Every blob reachable from a tree, as slash-joined paths in tree order
    pub fn flatten_tree(&self, tree_oid: &ObjectId) -> anyhow::Result<Vec<(String, ObjectId)>> {
        let mut files = Vec::new();
        self.flatten_tree_into(tree_oid, None, &mut files)?;
        Ok(files)
    }

    fn flatten_tree_into(
        &self,
        tree_oid: &ObjectId,
        prefix: Option<&str>,
        files: &mut Vec<(String, ObjectId)>,
    ) -> anyhow::Result<()> {
        let tree = self.parse_object_as_tree(tree_oid)?;

        for entry in tree.into_entries() {
            let path = match prefix {
                Some(prefix) => format!("{prefix}/{}", entry.name),
                None => entry.name,
            };

            if entry.mode.is_tree() {
                self.flatten_tree_into(&entry.oid, Some(&path), files)?;
            } else {
                files.push((path, entry.oid));
            }
        }

        Ok(())
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
