use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::EntryMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsTreeEntry {
    pub mode: EntryMode,
    pub object_type: ObjectType,
    pub oid: ObjectId,
    pub path: String,
}

impl std::fmt::Display for LsTreeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:0>6} {} {}\t{}",
            self.mode.as_str(),
            self.object_type,
            self.oid,
            self.path
        )
    }
}

impl Repository {
    /// List a tree, or the tree of a commit
    ///
    /// Without `recursive` one level is listed, with the type of each child read from the
    /// object database. With `recursive` only blobs are listed, under their full path.
    pub fn ls_tree(&self, tree_ish: &str, recursive: bool) -> anyhow::Result<Vec<LsTreeEntry>> {
        let (tree_oid, _) = self.find_object(tree_ish, Some(ObjectType::Tree))?;

        if recursive {
            return Ok(self
                .database()
                .flatten_tree(&tree_oid)?
                .into_iter()
                .map(|(path, oid)| LsTreeEntry {
                    mode: EntryMode::Regular,
                    object_type: ObjectType::Blob,
                    oid,
                    path,
                })
                .collect());
        }

        self.database()
            .parse_object_as_tree(&tree_oid)?
            .into_entries()
            .map(|entry| {
                Ok(LsTreeEntry {
                    mode: entry.mode,
                    object_type: self.database().object_type(&entry.oid)?,
                    oid: entry.oid,
                    path: entry.name,
                })
            })
            .collect()
    }
}
