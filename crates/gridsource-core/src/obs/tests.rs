use crate::{
    datasource::CollectionOperation,
    obs::{GlobalMetricsSink, MetricsEvent, MetricsSink, SkipReason, SortMode, metrics_report},
};

// Entity paths are unique to each test; global counters are shared by the
// whole test binary.

#[test]
fn global_sink_accumulates_per_entity_counters() {
    const ENTITY: &str = "obs_test$Accumulate";
    let sink = GlobalMetricsSink;

    sink.record(MetricsEvent::LoadStart {
        entity_path: ENTITY,
    });
    sink.record(MetricsEvent::LoadFinish {
        entity_path: ENTITY,
        rows_loaded: 12,
    });
    sink.record(MetricsEvent::LoadStart {
        entity_path: ENTITY,
    });
    sink.record(MetricsEvent::LoadFailed {
        entity_path: ENTITY,
    });

    let report = metrics_report();
    let counters = report
        .entity(ENTITY)
        .expect("entity counters should exist after recording");

    assert_eq!(counters.load_calls, 2);
    assert_eq!(counters.rows_loaded, 12);
    assert_eq!(counters.load_errors, 1);
}

#[test]
fn global_sink_counts_skips_sorts_and_mutations() {
    const ENTITY: &str = "obs_test$Mixed";
    let sink = GlobalMetricsSink;

    sink.record(MetricsEvent::LoadSkipped {
        entity_path: ENTITY,
        reason: SkipReason::DenyingFilter,
    });
    sink.record(MetricsEvent::Sort {
        entity_path: ENTITY,
        mode: SortMode::InMemory,
    });
    for op in [
        CollectionOperation::Add,
        CollectionOperation::Add,
        CollectionOperation::Remove,
        CollectionOperation::Update,
    ] {
        sink.record(MetricsEvent::Mutation {
            entity_path: ENTITY,
            op,
        });
    }

    let report = metrics_report();
    let counters = report
        .entity(ENTITY)
        .expect("entity counters should exist after recording");

    assert_eq!(counters.loads_skipped, 1);
    assert_eq!(counters.sorts, 1);
    assert_eq!(counters.adds, 2);
    assert_eq!(counters.removes, 1);
    assert_eq!(counters.updates, 1);
}
