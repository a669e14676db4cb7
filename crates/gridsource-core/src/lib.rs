//! Core runtime for gridsource: the collection datasource and everything it
//! is built from (values, filters, load requests, caches, aggregates), plus
//! the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod aggregate;
pub mod cache;
pub mod config;
pub mod datasource;
pub mod error;
pub mod filter;
pub mod model;
pub mod obs;
pub mod query;
pub mod service;
pub mod session;
pub mod traits;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or caches are re-exported here.
///

pub mod prelude {
    pub use crate::{
        datasource::{
            CollectionDatasource, CollectionOperation, DatasourceEvent, DatasourceState,
            RefreshMode,
        },
        filter::{CompareOp, Condition, Filter, Params},
        query::{SortDirection, SortInfo},
        service::{LoadService, PermissionChecker},
        session::UserSession,
        traits::{EntityKey, EntityKind},
        value::Value,
    };
}
