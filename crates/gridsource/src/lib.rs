//! ## Crate layout
//! - `core`: the collection datasource and its building blocks (values,
//!   filters, load requests, caches, aggregates, observability).
//!
//! The `prelude` module mirrors the surface used by UI-binding code that
//! opens datasources and reacts to their events.

pub use gridsource_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Structured error returned by every fallible datasource operation.
pub use gridsource_core::error::InternalError as Error;

pub use gridsource_core::{config::DatasourceConfig, datasource::CollectionDatasource};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        aggregate::{AggregateKind, AggregationSpec},
        config::DatasourceConfig,
        datasource::{
            CollectionDatasource, CollectionOperation, DatasourceEvent, DatasourceListener as _,
            DatasourceState, RefreshMode,
        },
        filter::{CompareOp, Condition, Filter, Params},
        query::{LoadContext, SortDirection, SortInfo},
        service::{EntityOp, ItemObserver as _, LoadError, LoadService, PermissionChecker},
        session::UserSession,
        traits::{EntityKey, EntityKind},
        value::Value,
    };
    pub use serde::{Deserialize, Serialize};
}
