use crate::{
    datasource::{CollectionDatasource, CollectionOperation, DatasourceEvent, EventBuffer, Inner},
    error::InternalError,
    model::PropertyPath,
    traits::EntityKind,
};

impl<E: EntityKind> CollectionDatasource<E> {
    /// Insert `item`, recording it for creation when it is new.
    pub fn add_item(&self, item: E) -> Result<(), InternalError> {
        self.locked(|inner, events| {
            self.check_state_locked(inner, events)?;

            let is_new = item.is_new();
            let pending = is_new.then(|| item.clone());
            let key = self.store(inner, item);
            if let Some(pending) = pending {
                inner.pending.created(key, pending);
            }
            inner.modified = true;

            self.changed(events, CollectionOperation::Add);
            Ok(())
        })
    }

    /// Remove `item` and record it for deletion. Absent items are ignored.
    pub fn remove_item(&self, item: &E) -> Result<(), InternalError> {
        self.locked(|inner, events| {
            self.check_state_locked(inner, events)?;

            let key = item.id();
            let Some(removed) = self.evict(inner, events, &key) else {
                return Ok(());
            };
            inner.pending.deleted(key, removed);
            inner.modified = true;

            self.changed(events, CollectionOperation::Remove);
            Ok(())
        })
    }

    /// Insert `item` without tracking it as a pending change.
    pub fn include_item(&self, item: E) -> Result<(), InternalError> {
        self.locked(|inner, events| {
            self.check_state_locked(inner, events)?;
            self.store(inner, item);

            self.changed(events, CollectionOperation::Add);
            Ok(())
        })
    }

    /// Remove `item` without tracking it as a pending change.
    pub fn exclude_item(&self, item: &E) -> Result<(), InternalError> {
        self.locked(|inner, events| {
            self.check_state_locked(inner, events)?;
            if self.evict(inner, events, &item.id()).is_none() {
                return Ok(());
            }

            self.changed(events, CollectionOperation::Remove);
            Ok(())
        })
    }

    /// Replace the cached instance with `item`, keeping its position.
    /// Absent keys are ignored.
    pub fn update_item(&self, item: E) -> Result<(), InternalError> {
        self.locked(|inner, events| {
            self.check_state_locked(inner, events)?;
            if !inner.cache.contains(&item.id()) {
                return Ok(());
            }
            self.store(inner, item);

            self.changed(events, CollectionOperation::Update);
            Ok(())
        })
    }

    /// Apply an edit of a cached item and record it as modified.
    ///
    /// New items are copied onto the cached instance in place; persisted
    /// items replace it. Absent keys are ignored.
    pub fn modify_item(&self, item: E) {
        self.locked(|inner, events| {
            let key = item.id();
            if !inner.cache.contains(&key) {
                return;
            }

            let modified = if item.is_new() {
                let Some(cached) = inner.cache.get_mut(&key) else {
                    return;
                };
                cached.copy_state_from(&item);
                cached.clone()
            } else {
                self.store(inner, item.clone());
                item
            };
            inner.pending.modified(key, modified);
            inner.modified = true;

            self.changed(events, CollectionOperation::Update);
        });
    }

    /// Property-change feedback from an item observer.
    pub fn item_property_changed(&self, key: &E::Key, property: impl Into<PropertyPath>) {
        let property = property.into();
        self.locked(|inner, events| {
            let Some(item) = inner.cache.get(key).cloned() else {
                return;
            };
            inner.pending.modified(key.clone(), item);
            inner.modified = true;

            events.push(DatasourceEvent::ItemPropertyChanged {
                key: key.clone(),
                property,
            });
        });
    }

    /// Drop every cached item.
    pub fn clear(&self) {
        self.locked(|inner, events| self.clear_locked(inner, events));
    }

    /// Apply the post-commit versions of `entities` and reset change
    /// tracking.
    pub fn committed(&self, entities: impl IntoIterator<Item = E>) {
        self.locked(|inner, events| {
            for entity in entities {
                if inner.cache.contains(&entity.id()) {
                    self.store(inner, entity);
                }
            }
            inner.modified = false;
            inner.pending.clear();

            self.changed(events, CollectionOperation::Update);
        });
    }

    // ------------------------------------------------------------------
    // Locked
    // ------------------------------------------------------------------

    pub(super) fn clear_locked(&self, inner: &mut Inner<E>, events: &mut EventBuffer<E::Key>) {
        Self::select(inner, events, None);
        self.drop_all(inner);

        self.changed(events, CollectionOperation::Remove);
    }

    // Remove one entry, releasing its observer and any selection of it.
    fn evict(
        &self,
        inner: &mut Inner<E>,
        events: &mut EventBuffer<E::Key>,
        key: &E::Key,
    ) -> Option<E> {
        let removed = inner.cache.remove(key)?;
        Self::deselect_key(inner, events, key);
        self.observer.detach(&removed);

        Some(removed)
    }

    fn changed(&self, events: &mut EventBuffer<E::Key>, op: CollectionOperation) {
        events.collection_changed(op);
        self.record_mutation(op);
    }
}
