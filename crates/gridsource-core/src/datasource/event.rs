use crate::{datasource::DatasourceState, model::PropertyPath};
use std::sync::Arc;

///
/// CollectionOperation
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CollectionOperation {
    Add,
    Remove,
    Refresh,
    Update,
}

///
/// DatasourceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DatasourceEvent<K> {
    CollectionChanged(CollectionOperation),
    StateChanged {
        previous: DatasourceState,
        current: DatasourceState,
    },
    ItemChanged {
        previous: Option<K>,
        current: Option<K>,
    },
    ItemPropertyChanged {
        key: K,
        property: PropertyPath,
    },
}

///
/// DatasourceListener
///
/// Synchronous observer. Called after the datasource lock is released, so
/// listeners may read from or call back into the datasource.
///

pub trait DatasourceListener<K>: Send + Sync {
    fn on_event(&self, event: &DatasourceEvent<K>);
}

impl<K, F> DatasourceListener<K> for F
where
    F: Fn(&DatasourceEvent<K>) + Send + Sync,
{
    fn on_event(&self, event: &DatasourceEvent<K>) {
        self(event);
    }
}

///
/// ListenerHandle
///
/// Returned by `subscribe`; pass back to `unsubscribe`.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ListenerHandle(pub(crate) u64);

pub(crate) type SharedListener<K> = Arc<dyn DatasourceListener<K>>;

///
/// EventBuffer
///
/// Events produced while the datasource lock is held, in production order.
///

pub(crate) struct EventBuffer<K> {
    events: Vec<DatasourceEvent<K>>,
    pub(crate) refresh_started: bool,
}

impl<K> EventBuffer<K> {
    pub(crate) const fn new() -> Self {
        Self {
            events: Vec::new(),
            refresh_started: false,
        }
    }

    pub(crate) fn push(&mut self, event: DatasourceEvent<K>) {
        self.events.push(event);
    }

    pub(crate) fn collection_changed(&mut self, op: CollectionOperation) {
        self.push(DatasourceEvent::CollectionChanged(op));
    }

    pub(crate) fn into_events(self) -> Vec<DatasourceEvent<K>> {
        self.events
    }
}
