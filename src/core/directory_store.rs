/*
 * The observable collection mirroring one backend-scanned directory: an
 * ordered list of entry cells plus a path-tree index kept in exact lockstep
 * with it. Every mutation pairs the list change with the matching tree
 * change inside a single snapshot-read -> mutate -> publish cycle, so
 * subscribers never observe the two out of sync.
 */
use serde::{Deserialize, Serialize};

use super::entry::{Entry, EntryCell};
use super::identity::DirectoryId;
use super::observable::{Observable, SubscriptionId};
use super::path_tree::PathTree;

/*
 * The backend's record of a scanned directory. Scan behavior flags are
 * carried as data; scanning itself happens on the far side.
 */
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Directory {
    pub id: DirectoryId,
    pub path: String,
    #[serde(default)]
    pub ignore_dot: bool,
    #[serde(default)]
    pub sync_on_load: bool,
}

impl Directory {
    pub fn new(id: DirectoryId, path: impl Into<String>) -> Self {
        Directory {
            id,
            path: path.into(),
            ignore_dot: false,
            sync_on_load: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryContents {
    pub entries: Vec<EntryCell>,
    pub tree: PathTree,
    pub directory: Directory,
}

#[derive(Debug, Clone)]
pub struct DirectoryStore {
    state: Observable<DirectoryContents>,
}

impl DirectoryStore {
    pub fn new(directory: Directory) -> Self {
        DirectoryStore {
            state: Observable::new(DirectoryContents {
                entries: Vec::new(),
                tree: PathTree::new(),
                directory,
            }),
        }
    }

    pub fn id(&self) -> DirectoryId {
        self.state.with_value(|c| c.directory.id)
    }

    pub fn snapshot(&self) -> DirectoryContents {
        self.state.snapshot()
    }

    pub fn subscribe(&self, listener: Box<dyn FnMut(&DirectoryContents)>) -> SubscriptionId {
        self.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /*
     * Adds an entry. If a cell with the same path already exists this is a
     * silent no-op (entry identity is unique within a store, and no publish
     * occurs). Otherwise the entry is wrapped in a fresh cell, appended to
     * the ordered collection, and its path inserted into the tree index,
     * all in one published update.
     *
     * A path the tree cannot index (no segments, e.g. "" or "/") is
     * rejected outright; accepting it would leave the list and tree out of
     * lockstep.
     */
    pub fn add_entry(&self, entry: Entry) {
        if !PathTree::indexable(&entry.path) {
            log::warn!(
                "DirectoryStore: rejecting unindexable entry path '{}' in '{}'",
                entry.path,
                self.state.with_value(|c| c.directory.path.clone())
            );
            return;
        }
        let duplicate = self
            .state
            .with_value(|c| c.entries.iter().any(|cell| cell.path() == entry.path));
        if duplicate {
            log::debug!(
                "DirectoryStore: ignoring duplicate entry '{}' in '{}'",
                entry.path,
                self.state.with_value(|c| c.directory.path.clone())
            );
            return;
        }
        self.state.update(|c| {
            c.tree.insert(&entry.path);
            c.entries.push(EntryCell::new(entry));
        });
    }

    /*
     * Drops any cell whose current path equals `path` and removes the path
     * from the tree index. Absent paths are a silent no-op with no publish.
     */
    pub fn remove_by_path(&self, path: &str) {
        let present = self
            .state
            .with_value(|c| c.entries.iter().any(|cell| cell.path() == path));
        if !present {
            return;
        }
        self.state.update(|c| {
            c.entries.retain(|cell| cell.path() != path);
            c.tree.remove(path);
        });
    }

    /* Linear scan for a path match; absence is not an error. */
    pub fn get_by_path(&self, path: &str) -> Option<EntryCell> {
        self.state
            .with_value(|c| c.entries.iter().find(|cell| cell.path() == path).cloned())
    }

    pub fn entry_count(&self) -> usize {
        self.state.with_value(|c| c.entries.len())
    }
}
