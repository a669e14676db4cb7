//! Load pipeline and state transitions.

use crate::{
    datasource::{
        CollectionDatasource, CollectionOperation, DatasourceEvent, DatasourceState, EventBuffer,
        Inner, RefreshMode,
    },
    error::InternalError,
    filter::Params,
    obs::{MetricsEvent, SkipReason},
    query::{LoadContext, LoadContextBuilder},
    service::LoadError,
    traits::EntityKind,
};
use std::{thread, time::Instant};

impl<E: EntityKind> CollectionDatasource<E> {
    /// Reload from the load service using the last saved parameters.
    ///
    /// Listeners are notified before a load failure is returned; the failure
    /// also stays readable through [`Self::data_load_error`].
    pub fn refresh(&self) -> Result<(), InternalError> {
        self.locked(|inner, events| self.refresh_locked(inner, events, None))
    }

    /// Reload with `params`, saving them for later refreshes.
    pub fn refresh_with(&self, params: Params) -> Result<(), InternalError> {
        self.locked(|inner, events| self.refresh_locked(inner, events, Some(params)))
    }

    /// Discard local changes.
    pub fn revert(&self) -> Result<(), InternalError> {
        self.locked(|inner, events| match inner.config.refresh_mode {
            RefreshMode::Always => self.refresh_locked(inner, events, None),
            RefreshMode::Never => {
                self.clear_locked(inner, events);
                Self::invalidate_locked(inner, events);
                Self::valid_locked(inner, events);

                Ok(())
            }
        })
    }

    /// Mark the cached data stale and drop pending changes.
    pub fn invalidate(&self) {
        self.locked(Self::invalidate_locked);
    }

    /// Mark the cached data current.
    pub fn valid(&self) {
        self.locked(Self::valid_locked);
    }

    /// Failure captured by the most recent load, if it failed.
    #[must_use]
    pub fn data_load_error(&self) -> Option<LoadError> {
        self.inner.lock().data_load_error.clone()
    }

    /// Whether the filter permits loading at all.
    #[must_use]
    pub fn need_loading(&self) -> bool {
        !self
            .inner
            .lock()
            .filter
            .as_ref()
            .is_some_and(|filter| filter.is_denying())
    }

    /// The request the next refresh would send, built from the saved
    /// parameters. `None` when the filter denies everything.
    #[must_use]
    pub fn compiled_load_context(&self) -> Option<LoadContext> {
        Self::build_context(&self.inner.lock())
    }

    // ------------------------------------------------------------------
    // Locked
    // ------------------------------------------------------------------

    pub(super) fn refresh_locked(
        &self,
        inner: &mut Inner<E>,
        events: &mut EventBuffer<E::Key>,
        params: Option<Params>,
    ) -> Result<(), InternalError> {
        // a listener reacting to this thread's own refresh
        let thread = thread::current().id();
        if inner.refreshing.contains(&thread) {
            return Ok(());
        }
        inner.refreshing.push(thread);
        events.refresh_started = true;

        if inner.config.refresh_mode == RefreshMode::Never {
            self.metrics.record(MetricsEvent::LoadSkipped {
                entity_path: E::ENTITY_NAME,
                reason: SkipReason::ManualRefreshMode,
            });
            Self::invalidate_locked(inner, events);
            self.finish_refresh(inner, events);

            return Ok(());
        }

        if let Some(params) = params {
            inner.saved_params = params;
        }
        Self::invalidate_locked(inner, events);

        let loaded = self.load_data(inner);
        self.finish_refresh(inner, events);

        loaded.map_err(InternalError::from)
    }

    // Refill the cache from the load service. Permission denial and denying
    // filters empty the cache without an error.
    fn load_data(&self, inner: &mut Inner<E>) -> Result<(), LoadError> {
        inner.data_load_error = None;

        if !self.session.is_read_permitted(E::ENTITY_NAME) {
            tracing::debug!(
                datasource = %self.id,
                entity = E::ENTITY_NAME,
                "read not permitted, load skipped"
            );
            self.skip_load(inner, SkipReason::PermissionDenied);
            return Ok(());
        }

        let denying = inner.filter.as_ref().is_some_and(|filter| filter.is_denying());
        let context = if denying {
            None
        } else {
            Self::build_context(inner)
        };
        let Some(context) = context else {
            tracing::debug!(
                datasource = %self.id,
                entity = E::ENTITY_NAME,
                "filter denies all rows, load skipped"
            );
            self.skip_load(inner, SkipReason::DenyingFilter);
            return Ok(());
        };

        self.metrics.record(MetricsEvent::LoadStart {
            entity_path: E::ENTITY_NAME,
        });
        let started = Instant::now();

        match self.service.load_list(&context) {
            Ok(items) => {
                let rows = items.len();
                self.replace_all(inner, items);
                inner.last_query = Some(context.query);

                self.metrics.record(MetricsEvent::LoadFinish {
                    entity_path: E::ENTITY_NAME,
                    rows_loaded: u64::try_from(rows).unwrap_or(u64::MAX),
                });
                tracing::debug!(
                    datasource = %self.id,
                    entity = E::ENTITY_NAME,
                    rows,
                    elapsed_us = started.elapsed().as_micros(),
                    "datasource loaded"
                );

                Ok(())
            }
            Err(err) => {
                self.metrics.record(MetricsEvent::LoadFailed {
                    entity_path: E::ENTITY_NAME,
                });
                tracing::warn!(
                    datasource = %self.id,
                    entity = E::ENTITY_NAME,
                    error = %err,
                    "datasource load failed"
                );
                inner.data_load_error = Some(err.clone());
                self.drop_all(inner);

                Err(err)
            }
        }
    }

    fn skip_load(&self, inner: &mut Inner<E>, reason: SkipReason) {
        self.metrics.record(MetricsEvent::LoadSkipped {
            entity_path: E::ENTITY_NAME,
            reason,
        });
        self.drop_all(inner);
    }

    // Common tail of every refresh.
    fn finish_refresh(&self, inner: &mut Inner<E>, events: &mut EventBuffer<E::Key>) {
        Self::valid_locked(inner, events);

        if let Some(key) = inner.selected.clone()
            && !inner.cache.contains(&key)
        {
            Self::select(inner, events, None);
        }

        if let Some(sort) = inner.sort.clone() {
            self.sort_in_memory(inner, &sort);
        }

        inner.suspended = false;
        inner.refresh_owed = false;
        events.collection_changed(CollectionOperation::Refresh);
    }

    fn build_context(inner: &Inner<E>) -> Option<LoadContext> {
        LoadContextBuilder::new(E::ENTITY_NAME)
            .filter(inner.filter.as_ref())
            .params(&inner.saved_params)
            .sort(inner.sort.as_ref(), inner.config.sort_on_backend)
            .page(inner.first_result, inner.config.max_results)
            .view(inner.config.view.as_deref())
            .soft_deletion(inner.config.soft_deletion)
            .history(inner.query_key, &inner.prev_queries)
            .build()
    }

    pub(super) fn invalidate_locked(inner: &mut Inner<E>, events: &mut EventBuffer<E::Key>) {
        if inner.state == DatasourceState::Valid {
            inner.state = DatasourceState::Invalid;
            events.push(DatasourceEvent::StateChanged {
                previous: DatasourceState::Valid,
                current: DatasourceState::Invalid,
            });
        }
        inner.modified = false;
        inner.pending.clear();
    }

    pub(super) fn valid_locked(inner: &mut Inner<E>, events: &mut EventBuffer<E::Key>) {
        let previous = inner.state;
        if previous != DatasourceState::Valid {
            inner.state = DatasourceState::Valid;
            events.push(DatasourceEvent::StateChanged {
                previous,
                current: DatasourceState::Valid,
            });
        }
    }

    // Refresh first when the cached data is not current.
    pub(super) fn check_state_locked(
        &self,
        inner: &mut Inner<E>,
        events: &mut EventBuffer<E::Key>,
    ) -> Result<(), InternalError> {
        if inner.state.is_valid() {
            Ok(())
        } else {
            self.refresh_locked(inner, events, None)
        }
    }
}
