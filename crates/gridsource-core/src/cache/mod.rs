//! Module: cache
//! Responsibility: ordered key → entity storage behind every datasource.
//! Does not own: datasource state checks (`NotInitialized` reads are rejected
//! one level up) or listener attachment.

#[cfg(test)]
mod tests;

use indexmap::IndexMap;
use std::{cmp::Ordering, hash::Hash};

///
/// OrderedCache
///
/// Insertion-ordered mapping from key to entity.
///
/// - `put` on an existing key replaces the entity in place (position kept)
/// - `put` on a new key appends
/// - `sort_by` is the only operation that redefines order
///

#[derive(Clone, Debug)]
pub struct OrderedCache<K, E> {
    entries: IndexMap<K, E>,
}

impl<K, E> Default for OrderedCache<K, E> {
    fn default() -> Self {
        Self {
            entries: IndexMap::default(),
        }
    }
}

impl<K: Clone + Eq + Hash, E> OrderedCache<K, E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&E> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut E> {
        self.entries.get_mut(key)
    }

    /// Keys in current order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Entities in current order.
    pub fn values(&self) -> impl Iterator<Item = &E> {
        self.entries.values()
    }

    /// Upsert an entity, returning the one it replaced.
    pub fn put(&mut self, key: K, entity: E) -> Option<E> {
        self.entries.insert(key, entity)
    }

    /// Remove an entity, keeping the relative order of the rest.
    pub fn remove(&mut self, key: &K) -> Option<E> {
        self.entries.shift_remove(key)
    }

    /// Remove every entity, returning them in their former order.
    pub fn take_all(&mut self) -> Vec<E> {
        self.entries.drain(..).map(|(_, entity)| entity).collect()
    }

    /// Replace the whole contents, returning the previous entities.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = (K, E)>) -> Vec<E> {
        let previous = self.take_all();
        self.entries.extend(entries);

        previous
    }

    ///
    /// NAVIGATION
    ///

    #[must_use]
    pub fn first_key(&self) -> Option<&K> {
        self.entries.first().map(|(key, _)| key)
    }

    #[must_use]
    pub fn last_key(&self) -> Option<&K> {
        self.entries.last().map(|(key, _)| key)
    }

    /// Key following `key`; `None` at the end or for an unknown key.
    #[must_use]
    pub fn next_key(&self, key: &K) -> Option<&K> {
        let index = self.entries.get_index_of(key)?;
        self.entries.get_index(index + 1).map(|(key, _)| key)
    }

    /// Key preceding `key`; `None` at the start or for an unknown key.
    #[must_use]
    pub fn prev_key(&self, key: &K) -> Option<&K> {
        let index = self.entries.get_index_of(key)?;
        let prev = index.checked_sub(1)?;
        self.entries.get_index(prev).map(|(key, _)| key)
    }

    ///
    /// ORDERING
    ///

    /// Redefine the order with a stable sort over entities.
    pub fn sort_by(&mut self, mut cmp: impl FnMut(&E, &E) -> Ordering) {
        self.entries.sort_by(|_, left, _, right| cmp(left, right));
    }
}
