//! Metrics sink boundary.
//!
//! Datasource logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.

use crate::{datasource::CollectionOperation, obs::metrics};

///
/// SkipReason
///
/// Why a refresh finished without contacting the load service.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    PermissionDenied,
    DenyingFilter,
    ManualRefreshMode,
}

///
/// SortMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortMode {
    InMemory,
    Backend,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetricsEvent {
    LoadStart {
        entity_path: &'static str,
    },
    LoadFinish {
        entity_path: &'static str,
        rows_loaded: u64,
    },
    LoadFailed {
        entity_path: &'static str,
    },
    LoadSkipped {
        entity_path: &'static str,
        reason: SkipReason,
    },
    Sort {
        entity_path: &'static str,
        mode: SortMode,
    },
    Mutation {
        entity_path: &'static str,
        op: CollectionOperation,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent);
}

///
/// GlobalMetricsSink
/// Default process-wide sink that writes into global metrics state.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::LoadStart { entity_path } => {
                m.ops.load_calls = m.ops.load_calls.saturating_add(1);
                let entry = m.entity_mut(entity_path);
                entry.load_calls = entry.load_calls.saturating_add(1);
            }

            MetricsEvent::LoadFinish {
                entity_path,
                rows_loaded,
            } => {
                m.ops.rows_loaded = m.ops.rows_loaded.saturating_add(rows_loaded);
                let entry = m.entity_mut(entity_path);
                entry.rows_loaded = entry.rows_loaded.saturating_add(rows_loaded);
            }

            MetricsEvent::LoadFailed { entity_path } => {
                m.ops.load_errors = m.ops.load_errors.saturating_add(1);
                let entry = m.entity_mut(entity_path);
                entry.load_errors = entry.load_errors.saturating_add(1);
            }

            MetricsEvent::LoadSkipped {
                entity_path,
                reason,
            } => {
                m.ops.loads_skipped = m.ops.loads_skipped.saturating_add(1);
                if reason == SkipReason::PermissionDenied {
                    m.ops.permission_denials = m.ops.permission_denials.saturating_add(1);
                }
                let entry = m.entity_mut(entity_path);
                entry.loads_skipped = entry.loads_skipped.saturating_add(1);
            }

            MetricsEvent::Sort { entity_path, mode } => {
                match mode {
                    SortMode::InMemory => {
                        m.ops.sorts_in_memory = m.ops.sorts_in_memory.saturating_add(1);
                    }
                    SortMode::Backend => {
                        m.ops.sorts_backend = m.ops.sorts_backend.saturating_add(1);
                    }
                }
                let entry = m.entity_mut(entity_path);
                entry.sorts = entry.sorts.saturating_add(1);
            }

            MetricsEvent::Mutation { entity_path, op } => {
                m.ops.mutations = m.ops.mutations.saturating_add(1);
                let entry = m.entity_mut(entity_path);
                match op {
                    CollectionOperation::Add => entry.adds = entry.adds.saturating_add(1),
                    CollectionOperation::Remove => entry.removes = entry.removes.saturating_add(1),
                    CollectionOperation::Update | CollectionOperation::Refresh => {
                        entry.updates = entry.updates.saturating_add(1);
                    }
                }
            }
        });
    }
}

/// Snapshot the current metrics state for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}
