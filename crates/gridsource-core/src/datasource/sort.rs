use crate::{
    datasource::{CollectionDatasource, Inner},
    error::InternalError,
    obs::{MetricsEvent, SortMode},
    query::{SortInfo, single_sort_field},
    traits::EntityKind,
};

impl<E: EntityKind> CollectionDatasource<E> {
    /// Order the datasource by exactly one field.
    ///
    /// A changed sort reloads from the backend when the backend sorts and
    /// the cache may be partial; otherwise the cache is reordered in memory.
    pub fn sort(&self, sort_infos: &[SortInfo]) -> Result<(), InternalError> {
        let sort = single_sort_field(sort_infos)?.clone();

        self.locked(|inner, events| {
            if inner.sort.as_ref() == Some(&sort) {
                return Ok(());
            }
            inner.sort = Some(sort.clone());

            if inner.cache.is_empty() {
                return Ok(());
            }

            if inner.config.sort_on_backend && !inner.contains_all_data() {
                self.metrics.record(MetricsEvent::Sort {
                    entity_path: E::ENTITY_NAME,
                    mode: SortMode::Backend,
                });
                self.refresh_locked(inner, events, None)
            } else {
                self.sort_in_memory(inner, &sort);
                Ok(())
            }
        })
    }

    #[must_use]
    pub fn sort_info(&self) -> Option<SortInfo> {
        self.inner.lock().sort.clone()
    }

    pub(super) fn sort_in_memory(&self, inner: &mut Inner<E>, sort: &SortInfo) {
        inner.cache.sort_by(sort.comparator::<E>());

        self.metrics.record(MetricsEvent::Sort {
            entity_path: E::ENTITY_NAME,
            mode: SortMode::InMemory,
        });
        tracing::trace!(
            datasource = %self.id,
            entity = E::ENTITY_NAME,
            property = %sort.property,
            direction = ?sort.direction,
            "sorted in memory"
        );
    }
}
