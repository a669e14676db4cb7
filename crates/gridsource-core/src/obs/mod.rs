//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Structured logs go through `tracing`; this module only owns counters.

pub(crate) mod metrics;
pub(crate) mod sink;

#[cfg(test)]
mod tests;

// re-exports
pub use metrics::{EntityCounters, EventOps, EventReport, EventState};
pub use sink::{
    GlobalMetricsSink, MetricsEvent, MetricsSink, SkipReason, SortMode, metrics_report,
    metrics_reset_all,
};
