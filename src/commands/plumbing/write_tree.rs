use crate::areas::repository::Repository;
use crate::artifacts::index::path_tree::{PathNode, PathTree};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{EntryMode, Tree, TreeEntry};

impl Repository {
    /// Store the tree objects for the current index and return the root tree hash
    pub fn write_tree(&self) -> anyhow::Result<ObjectId> {
        let index = self.load_index()?;
        self.build_tree_object(&index.to_path_tree())
    }

    /// Store a tree for every directory of `path_tree`, children before their parent
    pub fn build_tree_object(&self, path_tree: &PathTree) -> anyhow::Result<ObjectId> {
        let entries = path_tree
            .children()
            .map(|(name, node)| match node {
                PathNode::Leaf(oid) => Ok(TreeEntry::new(
                    EntryMode::Regular,
                    name.to_string(),
                    oid.clone(),
                )),
                PathNode::Tree(subtree) => Ok(TreeEntry::new(
                    EntryMode::Directory,
                    name.to_string(),
                    self.build_tree_object(subtree)?,
                )),
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        self.database().store(&Tree::new(entries))
    }
}
