/*
 * Registry of every directory store the backend has handed over, with an
 * optional single "selected" store. Identity is the directory's canonical
 * UUID; duplicate inserts are silently ignored. Selection always replaces,
 * and removal never leaves the selection pointing at a removed store.
 */
use super::directory_store::{Directory, DirectoryStore};
use super::identity::DirectoryId;
use super::observable::{Observable, SubscriptionId};

#[derive(Debug, Clone, Default)]
pub struct DirectoryRegistryContents {
    pub directories: Vec<DirectoryStore>,
    pub selected: Option<DirectoryStore>,
}

#[derive(Debug, Clone)]
pub struct DirectoryRegistry {
    state: Observable<DirectoryRegistryContents>,
}

impl DirectoryRegistry {
    pub fn new() -> Self {
        DirectoryRegistry {
            state: Observable::new(DirectoryRegistryContents::default()),
        }
    }

    pub fn snapshot(&self) -> DirectoryRegistryContents {
        self.state.snapshot()
    }

    pub fn subscribe(
        &self,
        listener: Box<dyn FnMut(&DirectoryRegistryContents)>,
    ) -> SubscriptionId {
        self.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /*
     * Wraps the directory in a new store and appends it, returning the
     * store that now owns the id. A directory whose id is already present
     * is not inserted again; the existing store is returned.
     */
    pub fn add_directory(&self, directory: Directory) -> DirectoryStore {
        if let Some(existing) = self.get_by_id(&directory.id) {
            log::debug!(
                "DirectoryRegistry: ignoring duplicate directory {}",
                directory.id
            );
            return existing;
        }
        log::debug!(
            "DirectoryRegistry: adding directory {} ('{}')",
            directory.id,
            directory.path
        );
        let store = DirectoryStore::new(directory);
        let result = store.clone();
        self.state.update(|c| c.directories.push(store));
        result
    }

    /*
     * Removes the store with the given id. If it was the selected store the
     * selection is cleared rather than left dangling. Absent ids are a
     * no-op.
     */
    pub fn remove_by_id(&self, id: &DirectoryId) {
        let present = self
            .state
            .with_value(|c| c.directories.iter().any(|d| d.id() == *id));
        if !present {
            return;
        }
        self.state.update(|c| {
            c.directories.retain(|d| d.id() != *id);
            if c.selected.as_ref().is_some_and(|s| s.id() == *id) {
                c.selected = None;
            }
        });
    }

    /* Linear scan on canonical identity. */
    pub fn get_by_id(&self, id: &DirectoryId) -> Option<DirectoryStore> {
        self.state
            .with_value(|c| c.directories.iter().find(|d| d.id() == *id).cloned())
    }

    /*
     * Marks the matching store selected, replacing any prior selection. An
     * id with no matching store clears the selection; no error either way.
     */
    pub fn select(&self, id: &DirectoryId) {
        self.state.update(|c| {
            c.selected = c.directories.iter().find(|d| d.id() == *id).cloned();
        });
    }

    pub fn selected(&self) -> Option<DirectoryStore> {
        self.state.with_value(|c| c.selected.clone())
    }

    pub fn clear(&self) {
        log::debug!("DirectoryRegistry: clearing");
        self.state.set(DirectoryRegistryContents::default());
    }

    pub fn len(&self) -> usize {
        self.state.with_value(|c| c.directories.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DirectoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
