//! Module: datasource
//! Responsibility: the collection datasource, an observable, ordered, keyed
//! cache of entities kept in sync with a load service.
//! Does not own: value ordering, filter binding, load request shape.
//! Boundary: all state lives behind one mutex; listener notifications are
//! delivered after that mutex is released.

mod event;
mod mutation;
mod paging;
mod pending;
mod refresh;
mod sort;
mod state;
mod suspend;


use crate::{
    aggregate::{AggregatableDelegate, AggregationSpec, ItemResolver},
    cache::OrderedCache,
    config::DatasourceConfig,
    error::InternalError,
    filter::{Filter, Params},
    model::PropertyPath,
    obs::{GlobalMetricsSink, MetricsEvent, MetricsSink},
    query::{LoadQuery, SortInfo},
    service::{ItemObserver, LoadError, LoadService, NoopItemObserver},
    session::UserSession,
    traits::EntityKind,
    value::Value,
};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use pending::PendingChanges;
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, ThreadId},
};
use thiserror::Error as ThisError;

// re-exports
pub(crate) use event::EventBuffer;
pub use event::{CollectionOperation, DatasourceEvent, DatasourceListener, ListenerHandle};
pub use state::{DatasourceState, RefreshMode};

use event::SharedListener;

///
/// DatasourceError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DatasourceError {
    #[error("invalid datasource state: {state}")]
    InvalidState { state: DatasourceState },

    #[error("item '{key}' is not in the datasource")]
    ItemNotCached { key: String },
}

///
/// Inner
///
/// Everything the datasource lock guards.
///

struct Inner<E: EntityKind> {
    cache: OrderedCache<E::Key, E>,
    pending: PendingChanges<E::Key, E>,
    state: DatasourceState,
    modified: bool,
    selected: Option<E::Key>,
    config: DatasourceConfig,
    filter: Option<Filter>,
    sort: Option<SortInfo>,
    saved_params: Params,
    first_result: usize,
    last_query: Option<LoadQuery>,
    prev_queries: Vec<LoadQuery>,
    query_key: Option<u64>,
    // threads whose refresh notifications are still being delivered
    refreshing: Vec<ThreadId>,
    suspended: bool,
    refresh_owed: bool,
    data_load_error: Option<LoadError>,
}

impl<E: EntityKind> Inner<E> {
    fn new(config: DatasourceConfig, filter: Option<Filter>) -> Self {
        Self {
            cache: OrderedCache::new(),
            pending: PendingChanges::default(),
            state: DatasourceState::NotInitialized,
            modified: false,
            selected: None,
            config,
            filter,
            sort: None,
            saved_params: Params::new(),
            first_result: 0,
            last_query: None,
            prev_queries: Vec::new(),
            query_key: None,
            refreshing: Vec::new(),
            suspended: false,
            refresh_owed: false,
            data_load_error: None,
        }
    }

    const fn is_initialized(&self) -> bool {
        !matches!(self.state, DatasourceState::NotInitialized)
    }

    fn ensure_initialized(&self) -> Result<(), DatasourceError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(DatasourceError::InvalidState { state: self.state })
        }
    }

    // The whole backend result fit in one page.
    fn contains_all_data(&self) -> bool {
        self.first_result == 0 && self.cache.len() < self.config.max_results
    }
}

///
/// CollectionDatasource
///
/// Ordered, keyed, observable cache of `E` instances.
///
/// Every public operation takes the internal lock for its whole duration,
/// including any load it performs. Events produced by the operation are
/// buffered and delivered to listeners in order once the lock is released.
///

pub struct CollectionDatasource<E: EntityKind> {
    id: String,
    service: Arc<dyn LoadService<E>>,
    session: Arc<UserSession>,
    observer: Arc<dyn ItemObserver<E>>,
    metrics: Arc<dyn MetricsSink>,
    inner: Mutex<Inner<E>>,
    listeners: RwLock<Vec<(ListenerHandle, SharedListener<E::Key>)>>,
    next_listener: AtomicU64,
}

impl<E: EntityKind> CollectionDatasource<E> {
    /// Start building a datasource over `service` within `session`.
    pub fn builder(
        id: impl Into<String>,
        service: Arc<dyn LoadService<E>>,
        session: Arc<UserSession>,
    ) -> CollectionDatasourceBuilder<E> {
        CollectionDatasourceBuilder::new(id.into(), service, session)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn session(&self) -> &Arc<UserSession> {
        &self.session
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub fn subscribe(&self, listener: Arc<dyn DatasourceListener<E::Key>>) -> ListenerHandle {
        let handle = ListenerHandle(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((handle, listener));

        handle
    }

    /// Remove a listener; returns whether it was registered.
    pub fn unsubscribe(&self, handle: ListenerHandle) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != handle);

        listeners.len() != before
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> DatasourceState {
        self.inner.lock().state
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.inner.lock().modified
    }

    /// Cached item under `key`.
    ///
    /// Fails with an invalid-state error before the first refresh.
    pub fn get_item(&self, key: &E::Key) -> Result<Option<E>, InternalError> {
        let inner = self.inner.lock();
        inner.ensure_initialized()?;

        Ok(inner.cache.get(key).cloned())
    }

    /// Keys in cache order; empty before the first refresh.
    #[must_use]
    pub fn item_ids(&self) -> Vec<E::Key> {
        let inner = self.inner.lock();
        if !inner.is_initialized() {
            return Vec::new();
        }

        inner.cache.keys().cloned().collect()
    }

    /// Cached items in cache order; empty before the first refresh.
    #[must_use]
    pub fn items(&self) -> Vec<E> {
        let inner = self.inner.lock();
        if !inner.is_initialized() {
            return Vec::new();
        }

        inner.cache.values().cloned().collect()
    }

    /// Number of cached items. Reports 0 before the first refresh and while
    /// suspended.
    #[must_use]
    pub fn size(&self) -> usize {
        let inner = self.inner.lock();
        if !inner.is_initialized() || inner.suspended {
            return 0;
        }

        inner.cache.len()
    }

    #[must_use]
    pub fn contains_item(&self, key: &E::Key) -> bool {
        self.inner.lock().cache.contains(key)
    }

    #[must_use]
    pub fn first_item_id(&self) -> Option<E::Key> {
        self.inner.lock().cache.first_key().cloned()
    }

    #[must_use]
    pub fn last_item_id(&self) -> Option<E::Key> {
        self.inner.lock().cache.last_key().cloned()
    }

    #[must_use]
    pub fn next_item_id(&self, key: &E::Key) -> Option<E::Key> {
        self.inner.lock().cache.next_key(key).cloned()
    }

    #[must_use]
    pub fn prev_item_id(&self, key: &E::Key) -> Option<E::Key> {
        self.inner.lock().cache.prev_key(key).cloned()
    }

    #[must_use]
    pub fn is_first_id(&self, key: &E::Key) -> bool {
        self.inner.lock().cache.first_key() == Some(key)
    }

    #[must_use]
    pub fn is_last_id(&self, key: &E::Key) -> bool {
        self.inner.lock().cache.last_key() == Some(key)
    }

    /// The selected item, if any.
    #[must_use]
    pub fn item(&self) -> Option<E> {
        let inner = self.inner.lock();
        inner
            .selected
            .as_ref()
            .and_then(|key| inner.cache.get(key))
            .cloned()
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<E::Key> {
        self.inner.lock().selected.clone()
    }

    /// Select the cached item under `key`, or clear the selection with
    /// `None`. Fires `ItemChanged` when the selection changes.
    pub fn set_item(&self, key: Option<E::Key>) -> Result<(), InternalError> {
        self.locked(|inner, events| {
            if let Some(key) = &key
                && !inner.cache.contains(key)
            {
                return Err(DatasourceError::ItemNotCached {
                    key: format!("{key:?}"),
                }
                .into());
            }
            Self::select(inner, events, key);

            Ok(())
        })
    }

    #[must_use]
    pub fn items_to_create(&self) -> Vec<E> {
        self.inner.lock().pending.to_create()
    }

    #[must_use]
    pub fn items_to_update(&self) -> Vec<E> {
        self.inner.lock().pending.to_update()
    }

    #[must_use]
    pub fn items_to_delete(&self) -> Vec<E> {
        self.inner.lock().pending.to_delete()
    }

    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.inner.lock().pending.is_empty()
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    #[must_use]
    pub fn filter(&self) -> Option<Filter> {
        self.inner.lock().filter.clone()
    }

    /// Replace the filter; takes effect on the next refresh.
    pub fn set_filter(&self, filter: Option<Filter>) {
        self.inner.lock().filter = filter;
    }

    #[must_use]
    pub fn refresh_mode(&self) -> RefreshMode {
        self.inner.lock().config.refresh_mode
    }

    pub fn set_refresh_mode(&self, mode: RefreshMode) {
        self.inner.lock().config.refresh_mode = mode;
    }

    #[must_use]
    pub fn config(&self) -> DatasourceConfig {
        self.inner.lock().config.clone()
    }

    // ------------------------------------------------------------------
    // Aggregation
    // ------------------------------------------------------------------

    /// Aggregate cached values of `keys`; unknown keys are skipped.
    pub fn aggregate(
        &self,
        specs: &[AggregationSpec],
        keys: &[E::Key],
    ) -> Result<IndexMap<AggregationSpec, String>, InternalError> {
        let inner = self.inner.lock();
        inner.ensure_initialized()?;

        let resolver = CacheResolver {
            cache: &inner.cache,
        };
        let results = AggregatableDelegate::new(&resolver).aggregate(specs, keys)?;

        Ok(results)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Run `op` under the lock, then deliver the events it buffered.
    fn locked<T>(&self, op: impl FnOnce(&mut Inner<E>, &mut EventBuffer<E::Key>) -> T) -> T {
        let mut events = EventBuffer::new();
        let mut release = RefreshRelease::new(&self.inner);
        let result = {
            let mut inner = self.inner.lock();
            release.outermost = !inner.refreshing.contains(&release.thread);
            op(&mut inner, &mut events)
        };
        release.started = events.refresh_started;
        self.dispatch(events);

        result
    }

    fn dispatch(&self, events: EventBuffer<E::Key>) {
        let events = events.into_events();
        if events.is_empty() {
            return;
        }

        let listeners: Vec<SharedListener<E::Key>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for event in &events {
            for listener in &listeners {
                listener.on_event(event);
            }
        }
    }

    fn select(inner: &mut Inner<E>, events: &mut EventBuffer<E::Key>, key: Option<E::Key>) {
        if inner.selected == key {
            return;
        }
        let previous = std::mem::replace(&mut inner.selected, key.clone());
        events.push(DatasourceEvent::ItemChanged {
            previous,
            current: key,
        });
    }

    // Drop the selection when it points at `key`.
    fn deselect_key(inner: &mut Inner<E>, events: &mut EventBuffer<E::Key>, key: &E::Key) {
        if inner.selected.as_ref() == Some(key) {
            Self::select(inner, events, None);
        }
    }

    // Upsert one item, moving the observer from any replaced instance.
    fn store(&self, inner: &mut Inner<E>, item: E) -> E::Key {
        let key = item.id();
        if let Some(previous) = inner.cache.get(&key) {
            self.observer.detach(previous);
        }
        self.observer.attach(&item);
        inner.cache.put(key.clone(), item);

        key
    }

    fn drop_all(&self, inner: &mut Inner<E>) {
        for item in inner.cache.take_all() {
            self.observer.detach(&item);
        }
    }

    fn replace_all(&self, inner: &mut Inner<E>, items: Vec<E>) {
        let previous = inner
            .cache
            .replace_all(items.into_iter().map(|item| (item.id(), item)));
        for item in &previous {
            self.observer.detach(item);
        }
        for item in inner.cache.values() {
            self.observer.attach(item);
        }
    }

    fn record_mutation(&self, op: CollectionOperation) {
        self.metrics.record(MetricsEvent::Mutation {
            entity_path: E::ENTITY_NAME,
            op,
        });
        tracing::trace!(
            datasource = %self.id,
            entity = E::ENTITY_NAME,
            ?op,
            "datasource mutation"
        );
    }
}

impl<E: EntityKind> fmt::Debug for CollectionDatasource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("CollectionDatasource")
            .field("id", &self.id)
            .field("entity", &E::ENTITY_NAME)
            .field("state", &inner.state)
            .field("len", &inner.cache.len())
            .finish_non_exhaustive()
    }
}

///
/// CacheResolver
///

struct CacheResolver<'a, E: EntityKind> {
    cache: &'a OrderedCache<E::Key, E>,
}

impl<E: EntityKind> ItemResolver<E::Key> for CacheResolver<'_, E> {
    fn item_value(&self, key: &E::Key, property: &PropertyPath) -> Option<Value> {
        self.cache.get(key).map(|item| item.get_value_ex(property))
    }
}

///
/// RefreshRelease
///
/// Ends the calling thread's refresh once its notifications are delivered,
/// including when a listener or the load service unwinds.
///

struct RefreshRelease<'a, E: EntityKind> {
    inner: &'a Mutex<Inner<E>>,
    thread: ThreadId,
    outermost: bool,
    started: bool,
}

impl<'a, E: EntityKind> RefreshRelease<'a, E> {
    fn new(inner: &'a Mutex<Inner<E>>) -> Self {
        Self {
            inner,
            thread: thread::current().id(),
            outermost: false,
            started: false,
        }
    }
}

impl<E: EntityKind> Drop for RefreshRelease<'_, E> {
    fn drop(&mut self) {
        if self.outermost && (self.started || thread::panicking()) {
            let thread = self.thread;
            self.inner.lock().refreshing.retain(|owner| *owner != thread);
        }
    }
}

///
/// CollectionDatasourceBuilder
///
/// Collaborators default to a no-op item observer and the global metrics
/// sink; config defaults to [`DatasourceConfig::default`].
///

pub struct CollectionDatasourceBuilder<E: EntityKind> {
    id: String,
    service: Arc<dyn LoadService<E>>,
    session: Arc<UserSession>,
    observer: Arc<dyn ItemObserver<E>>,
    metrics: Arc<dyn MetricsSink>,
    config: DatasourceConfig,
    filter: Option<Filter>,
}

impl<E: EntityKind> CollectionDatasourceBuilder<E> {
    fn new(id: String, service: Arc<dyn LoadService<E>>, session: Arc<UserSession>) -> Self {
        Self {
            id,
            service,
            session,
            observer: Arc::new(NoopItemObserver),
            metrics: Arc::new(GlobalMetricsSink),
            config: DatasourceConfig::default(),
            filter: None,
        }
    }

    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn ItemObserver<E>>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn config(mut self, config: DatasourceConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn refresh_mode(mut self, mode: RefreshMode) -> Self {
        self.config.refresh_mode = mode;
        self
    }

    #[must_use]
    pub fn sort_on_backend(mut self, sort_on_backend: bool) -> Self {
        self.config.sort_on_backend = sort_on_backend;
        self
    }

    #[must_use]
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = max_results;
        self
    }

    #[must_use]
    pub fn soft_deletion(mut self, soft_deletion: bool) -> Self {
        self.config.soft_deletion = soft_deletion;
        self
    }

    #[must_use]
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.config.view = Some(view.into());
        self
    }

    #[must_use]
    pub fn build(self) -> CollectionDatasource<E> {
        CollectionDatasource {
            id: self.id,
            service: self.service,
            session: self.session,
            observer: self.observer,
            metrics: self.metrics,
            inner: Mutex::new(Inner::new(self.config, self.filter)),
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }
}
