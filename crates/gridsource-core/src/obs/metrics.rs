use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::LazyLock,
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Ephemeral, in-memory counters for datasource operations.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
    pub since_ms: u64,
}

impl EventState {
    pub(crate) fn entity_mut(&mut self, entity_path: &str) -> &mut EntityCounters {
        self.entities.entry(entity_path.to_string()).or_default()
    }
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            entities: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Load pipeline
    pub load_calls: u64,
    pub load_errors: u64,
    pub loads_skipped: u64,
    pub permission_denials: u64,
    pub rows_loaded: u64,

    // Sort engine
    pub sorts_in_memory: u64,
    pub sorts_backend: u64,

    // Mutation tracker
    pub mutations: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityCounters {
    pub load_calls: u64,
    pub load_errors: u64,
    pub loads_skipped: u64,
    pub rows_loaded: u64,
    pub sorts: u64,
    pub adds: u64,
    pub removes: u64,
    pub updates: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the metrics state.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: Option<EventState>,
}

impl EventReport {
    /// Counters for one entity, if it has recorded anything.
    #[must_use]
    pub fn entity(&self, entity_path: &str) -> Option<&EntityCounters> {
        self.counters.as_ref()?.entities.get(entity_path)
    }
}

static EVENT_STATE: LazyLock<Mutex<EventState>> =
    LazyLock::new(|| Mutex::new(EventState::default()));

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    f(&mut EVENT_STATE.lock())
}

/// Reset all counters (useful in tests).
pub fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot the counters.
#[must_use]
pub fn report() -> EventReport {
    EventReport {
        counters: Some(with_state_mut(|m| m.clone())),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}
