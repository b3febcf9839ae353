use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{ObjectBox, hash_object_body};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::path::Path;

/// Hash `data` as an object of `object_type` without a repository
///
/// Trees and commits must decode as their kind; blobs take any bytes.
pub fn hash_detached(object_type: ObjectType, data: &[u8]) -> anyhow::Result<ObjectId> {
    validate_body(object_type, data)?;
    Ok(hash_object_body(object_type, data)?)
}

fn validate_body(object_type: ObjectType, data: &[u8]) -> anyhow::Result<()> {
    if object_type != ObjectType::Blob {
        ObjectBox::decode(object_type, Bytes::copy_from_slice(data))?;
    }

    Ok(())
}

impl Repository {
    pub fn hash_object(
        &self,
        object_type: ObjectType,
        data: &[u8],
        write: bool,
    ) -> anyhow::Result<ObjectId> {
        validate_body(object_type, data)?;
        self.database().hash_and_maybe_write(object_type, data, write)
    }

    pub fn hash_file(
        &self,
        object_type: ObjectType,
        object_path: &Path,
        write: bool,
    ) -> anyhow::Result<ObjectId> {
        let data = std::fs::read(object_path)
            .with_context(|| format!("Unable to read {}", object_path.display()))?;

        self.hash_object(object_type, &data, write)
    }
}
