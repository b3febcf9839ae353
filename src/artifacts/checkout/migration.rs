//! Checkout migration planning
//!
//! Switching branches turns the files tracked by the current index into the files of the
//! target commit's tree. The migration compares both sides path by path and groups the
//! file system work into actions; the workspace then applies them.

use crate::areas::database::Database;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, HashMap};

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Modify existing file
    Modify,
}

/// Planned actions grouped by type; each path carries the blob it should end up with,
/// or the blob it had for deletions
pub type ActionsSet = BTreeMap<ActionType, Vec<(String, ObjectId)>>;

pub struct Migration<'r> {
    database: &'r Database,
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    /// Plan the move from `current` (path, blob) pairs to `target` ones
    pub fn plan<'e>(
        database: &'r Database,
        current: impl IntoIterator<Item = (&'e str, &'e ObjectId)>,
        target: &[(String, ObjectId)],
    ) -> Self {
        let current = current.into_iter().collect::<HashMap<_, _>>();
        let target_paths = target
            .iter()
            .map(|(path, _)| path.as_str())
            .collect::<std::collections::HashSet<_>>();

        let mut actions = ActionsSet::new();

        for (path, oid) in target {
            match current.get(path.as_str()) {
                None => actions
                    .entry(ActionType::Add)
                    .or_default()
                    .push((path.clone(), oid.clone())),
                Some(&current_oid) if current_oid != oid => actions
                    .entry(ActionType::Modify)
                    .or_default()
                    .push((path.clone(), oid.clone())),
                Some(_) => {}
            }
        }

        let mut deletions = current
            .iter()
            .filter(|(path, _)| !target_paths.contains(*path))
            .map(|(path, oid)| (path.to_string(), (*oid).clone()))
            .collect::<Vec<_>>();
        deletions.sort();
        if !deletions.is_empty() {
            actions.insert(ActionType::Delete, deletions);
        }

        Migration { database, actions }
    }

    pub fn actions(&self, action: ActionType) -> impl Iterator<Item = &(String, ObjectId)> {
        self.actions.get(&action).into_iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.values().all(Vec::is_empty)
    }

    pub fn load_blob(&self, oid: &ObjectId) -> anyhow::Result<Blob> {
        self.database.parse_object_as_blob(oid)
    }
}
