use crate::{model::PropertyPath, value::Value};
use std::{fmt::Debug, hash::Hash};

// ============================================================================
// ENTITY IDENTITY
// ============================================================================
//
// These traits describe *what an entity is* to the datasource layer:
// how it is keyed, whether it is persisted, and how its properties are read.
//

///
/// EntityKey
///
/// Associates an entity with the type used as its primary key.
///
/// ## Semantics
/// - Keys are plain values (uuid, integer, composite struct, ...)
/// - A key is stable across reloads of the same persisted row
///

pub trait EntityKey {
    type Key: Clone + Debug + Eq + Hash + Send + Sync + 'static;
}

///
/// EntityKind
///
/// Runtime entity contract consumed by datasources.
///
/// `ENTITY_NAME` is the name the permission checker and load service know
/// the entity type by.
///

pub trait EntityKind: EntityKey + Clone + Debug + Send + Sync + 'static {
    const ENTITY_NAME: &'static str;

    /// Identity extraction used as the datasource cache key.
    fn id(&self) -> Self::Key;

    /// True while the instance has not been persisted yet.
    fn is_new(&self) -> bool;

    /// Read a direct property. Unknown properties read as `Value::Null`.
    fn get_value(&self, property: &str) -> Value;

    /// Read a property by path.
    ///
    /// Direct paths delegate to [`Self::get_value`]. Nested paths are looked
    /// up under their dotted name, so entities expose derived or
    /// association-backed values by answering for `"a.b"` in `get_value`.
    fn get_value_ex(&self, path: &PropertyPath) -> Value {
        if path.is_direct() {
            self.get_value(path.head())
        } else {
            self.get_value(&path.to_string())
        }
    }

    /// Copy the state of `source` onto `self`, keeping `self` as the
    /// instance UI bindings refer to.
    fn copy_state_from(&mut self, source: &Self) {
        self.clone_from(source);
    }
}
