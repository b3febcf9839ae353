use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::CalpError;
use bytes::Bytes;

impl Repository {
    /// Resolve `name` (hash, branch, `HEAD`, with `^`/`~n` suffixes) to an object
    ///
    /// When a tree is expected and `name` lands on a commit, the commit's tree is used.
    pub fn find_object(
        &self,
        name: &str,
        expected: Option<ObjectType>,
    ) -> anyhow::Result<(ObjectId, ObjectType)> {
        let oid = Revision::try_parse(name)?.resolve(self)?;
        let object_type = self.database().object_type(&oid)?;

        match (expected, object_type) {
            (None, _) => Ok((oid, object_type)),
            (Some(expected), actual) if expected == actual => Ok((oid, object_type)),
            (Some(ObjectType::Tree), ObjectType::Commit) => {
                let commit = self.database().parse_object_as_commit(&oid)?;
                Ok((commit.tree_oid().clone(), ObjectType::Tree))
            }
            (Some(expected), actual) => Err(CalpError::UnexpectedObjectType {
                oid,
                expected: expected.to_string(),
                actual: actual.to_string(),
            }
            .into()),
        }
    }

    /// Raw body of an object
    pub fn cat_file(
        &self,
        object_type: Option<ObjectType>,
        object: &str,
    ) -> anyhow::Result<(ObjectType, Bytes)> {
        let (oid, _) = self.find_object(object, object_type)?;
        self.database().read(&oid)
    }
}
