//! Nested view of the flat index, used to build tree objects
//!
//! Children keep the order in which their first path was inserted. Since the index
//! hands out entries sorted by path, this is the order tree entries are written in.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    Leaf(ObjectId),
    Tree(PathTree),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTree {
    children: Vec<(String, PathNode)>,
}

impl PathTree {
    pub fn from_entries<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> Self {
        let mut root = PathTree::default();
        for entry in entries {
            let segments = entry.path.split('/').collect::<Vec<_>>();
            root.insert(&segments, entry.oid.clone());
        }
        root
    }

    pub fn insert(&mut self, segments: &[&str], oid: ObjectId) {
        let Some((first, rest)) = segments.split_first() else {
            return;
        };

        let position = self.children.iter().position(|(name, _)| name == first);

        if rest.is_empty() {
            match position {
                Some(position) => self.children[position].1 = PathNode::Leaf(oid),
                None => self
                    .children
                    .push((first.to_string(), PathNode::Leaf(oid))),
            }
            return;
        }

        let position = match position {
            Some(position) => position,
            None => {
                self.children
                    .push((first.to_string(), PathNode::Tree(PathTree::default())));
                self.children.len() - 1
            }
        };

        let node = &mut self.children[position].1;
        if let PathNode::Leaf(_) = node {
            // a directory replaces a file of the same name
            *node = PathNode::Tree(PathTree::default());
        }
        if let PathNode::Tree(subtree) = node {
            subtree.insert(rest, oid);
        }
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &PathNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
