use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{BufRead, Cursor};

/// Encode an object into its canonical body (without the `<type> <size>\0` header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Decode an object from its canonical body; the header has already been consumed
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn object_id(&self) -> Result<ObjectId> {
        let body = self.serialize()?;
        Ok(hash_object_body(self.object_type(), &body)?)
    }
}

/// Hash `"<type> <len>\0" + body` without touching the object database
pub fn hash_object_body(
    object_type: ObjectType,
    body: &[u8],
) -> Result<ObjectId, crate::errors::CalpError> {
    let mut hasher = Sha1::new();
    hasher.update(object_type.header(body.len()).as_bytes());
    hasher.update(body);

    ObjectId::from_digest(&hasher.finalize())
}

/// Closed set of object kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn decode(object_type: ObjectType, body: Bytes) -> Result<Self> {
        let reader = Cursor::new(body);

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(reader)?))),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(blob) => blob.object_type(),
            ObjectBox::Tree(tree) => tree.object_type(),
            ObjectBox::Commit(commit) => commit.object_type(),
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        match self {
            ObjectBox::Blob(blob) => blob.serialize(),
            ObjectBox::Tree(tree) => tree.serialize(),
            ObjectBox::Commit(commit) => commit.serialize(),
        }
    }
}
