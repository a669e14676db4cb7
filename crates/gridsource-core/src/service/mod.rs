//! External collaborators a datasource consumes: the load service, the
//! permission checker, and per-item observers.

use crate::{query::LoadContext, traits::EntityKind};
use thiserror::Error as ThisError;

///
/// LoadError
///
/// Backend load failure. Captured by the datasource as its data load error
/// and surfaced after refresh notifications have been delivered.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum LoadError {
    #[error("load of '{entity}' failed: {message}")]
    Backend { entity: String, message: String },

    #[error("load of '{entity}' timed out")]
    Timeout { entity: String },
}

impl LoadError {
    /// Convenience constructor for service implementations.
    pub fn backend(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            entity: entity.into(),
            message: message.into(),
        }
    }
}

///
/// LoadService
///
/// Blocking backend load. Timeouts and retries are the service's concern.
///

pub trait LoadService<E: EntityKind>: Send + Sync {
    fn load_list(&self, context: &LoadContext) -> Result<Vec<E>, LoadError>;
}

impl<E, F> LoadService<E> for F
where
    E: EntityKind,
    F: Fn(&LoadContext) -> Result<Vec<E>, LoadError> + Send + Sync,
{
    fn load_list(&self, context: &LoadContext) -> Result<Vec<E>, LoadError> {
        self(context)
    }
}

///
/// EntityOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EntityOp {
    Create,
    Read,
    Update,
    Delete,
}

///
/// PermissionChecker
///
/// Consulted before every load; evaluation logic lives elsewhere.
///

pub trait PermissionChecker: Send + Sync {
    fn is_entity_op_permitted(&self, entity_name: &str, op: EntityOp) -> bool;
}

///
/// PermitAll
///

#[derive(Clone, Copy, Debug, Default)]
pub struct PermitAll;

impl PermissionChecker for PermitAll {
    fn is_entity_op_permitted(&self, _: &str, _: EntityOp) -> bool {
        true
    }
}

///
/// ItemObserver
///
/// Per-item property-change hookup. The datasource attaches every entity it
/// caches and detaches every entity it drops; observers report property
/// changes back through `CollectionDatasource::item_property_changed`.
///

pub trait ItemObserver<E: EntityKind>: Send + Sync {
    fn attach(&self, item: &E);
    fn detach(&self, item: &E);
}

///
/// NoopItemObserver
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopItemObserver;

impl<E: EntityKind> ItemObserver<E> for NoopItemObserver {
    fn attach(&self, _: &E) {}

    fn detach(&self, _: &E) {}
}
