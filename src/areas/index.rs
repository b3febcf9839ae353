//! Staging area
//!
//! The index tracks which blob is staged for each workspace path. It is persisted as a
//! text file, one `<hash> <path>` line per entry, sorted by path, and rewritten wholesale
//! on every update.
//!
//! ## Data Structures
//!
//! - `entries`: Maps file paths to their index entries; the map order is the on-disk order
//! - `children`: Maps directory paths to the tracked files beneath them, so that a file
//!   replacing a directory (or the reverse) can evict the entries it conflicts with

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::path_tree::PathTree;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.calp/index`)
    path: Box<Path>,
    /// Tracked files mapped by path
    entries: BTreeMap<String, IndexEntry>,
    /// Directory hierarchy for efficient parent-child lookups
    children: BTreeMap<String, BTreeSet<String>>,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Whether `path` is a tracked file or a directory containing tracked files
    pub fn is_directly_tracked(&self, path: &str) -> bool {
        self.entries.contains_key(path) || self.children.contains_key(path)
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.changed = false;
    }

    /// Load the index from disk; a missing file is an empty index
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read index file {}", self.path.display()))?;

        for (line_index, line) in content.lines().enumerate() {
            let entry = IndexEntry::parse_line(line_index + 1, line)?;
            self.store_entry(entry);
        }

        Ok(())
    }

    /// Remove any conflicting entries before adding a new entry
    ///
    /// Removes parent directories that might be file entries, and
    /// removes any children entries if this entry is becoming a file.
    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            self.remove_entry(parent);
        }
        self.remove_children(&entry.path);
    }

    fn store_entry(&mut self, entry: IndexEntry) {
        for parent in entry.parent_dirs() {
            self.children
                .entry(parent.to_string())
                .or_default()
                .insert(entry.path.clone());
        }

        self.entries.insert(entry.path.clone(), entry);
    }

    fn remove_children(&mut self, path: &str) {
        if let Some(children) = self.children.remove(path) {
            for child in children {
                self.remove_entry(&child);
            }
        }
    }

    fn remove_entry(&mut self, path: &str) {
        if let Some(entry) = self.entries.remove(path) {
            for parent in entry.parent_dirs() {
                if let Some(children) = self.children.get_mut(parent) {
                    children.remove(path);
                    if children.is_empty() {
                        self.children.remove(parent);
                    }
                }
            }
        }
    }

    /// Stage an entry, replacing any prior entry for the same path
    pub fn add(&mut self, entry: IndexEntry) {
        if self.entries.get(&entry.path) == Some(&entry) {
            return;
        }

        self.discard_conflicts(&entry);
        self.store_entry(entry);
        self.changed = true;
    }

    /// Unstage a file, or every file beneath a directory
    pub fn remove(&mut self, path: &str) {
        if self.is_directly_tracked(path) {
            self.remove_entry(path);
            self.remove_children(path);
            self.changed = true;
        }
    }

    /// Drop every entry and stage `entries` instead
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = IndexEntry>) {
        self.entries.clear();
        self.children.clear();

        for entry in entries {
            self.discard_conflicts(&entry);
            self.store_entry(entry);
        }
        self.changed = true;
    }

    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut content = String::new();
        for entry in self.entries() {
            content.push_str(&entry.to_line());
            content.push('\n');
        }

        std::fs::write(&self.path, content)
            .with_context(|| format!("Unable to write index file {}", self.path.display()))?;
        self.changed = false;

        tracing::debug!(entries = self.entries.len(), "index written");

        Ok(())
    }

    /// Entries sorted by path
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> impl Iterator<Item = IndexEntry> {
        self.entries.into_values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked paths equal to `path` or beneath it
    pub fn entries_under_path(&self, path: &str) -> Vec<String> {
        let prefix = format!("{path}/");

        self.entries
            .keys()
            .filter(|entry_path| entry_path.as_str() == path || entry_path.starts_with(&prefix))
            .cloned()
            .collect()
    }

    pub fn to_path_tree(&self) -> PathTree {
        PathTree::from_entries(self.entries())
    }
}
