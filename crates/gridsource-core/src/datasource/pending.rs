use indexmap::IndexMap;
use std::hash::Hash;

///
/// PendingChanges
///
/// Entities awaiting create, update or delete on the next commit.
/// A key appears in at most one set.
///

#[derive(Debug)]
pub(crate) struct PendingChanges<K, E> {
    create: IndexMap<K, E>,
    update: IndexMap<K, E>,
    delete: IndexMap<K, E>,
}

impl<K, E> Default for PendingChanges<K, E> {
    fn default() -> Self {
        Self {
            create: IndexMap::new(),
            update: IndexMap::new(),
            delete: IndexMap::new(),
        }
    }
}

impl<K: Eq + Hash, E: Clone> PendingChanges<K, E> {
    pub(crate) fn created(&mut self, key: K, item: E) {
        self.create.insert(key, item);
    }

    pub(crate) fn modified(&mut self, key: K, item: E) {
        if let Some(pending) = self.create.get_mut(&key) {
            *pending = item;
        } else {
            self.update.insert(key, item);
        }
    }

    // Deleting a never-persisted item just forgets it.
    pub(crate) fn deleted(&mut self, key: K, item: E) {
        if self.create.shift_remove(&key).is_some() {
            return;
        }
        self.update.shift_remove(&key);
        self.delete.insert(key, item);
    }

    pub(crate) fn clear(&mut self) {
        self.create.clear();
        self.update.clear();
        self.delete.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }

    pub(crate) fn to_create(&self) -> Vec<E> {
        self.create.values().cloned().collect()
    }

    pub(crate) fn to_update(&self) -> Vec<E> {
        self.update.values().cloned().collect()
    }

    pub(crate) fn to_delete(&self) -> Vec<E> {
        self.delete.values().cloned().collect()
    }
}
