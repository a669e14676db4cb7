//! User session: the scope that owns the query-key sequence and the
//! permission checker shared by every datasource opened in it.


use crate::service::{EntityOp, PermissionChecker, PermitAll};
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

///
/// QueryKeySequence
///
/// Session-wide monotonically increasing sequence of query keys. A key
/// correlates paging "drill-back" requests with the base query they started
/// from. The first key issued is 1; 0 means "never pinned".
///

#[derive(Debug, Default)]
pub struct QueryKeySequence {
    last: AtomicU64,
}

impl QueryKeySequence {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Issue the next key.
    pub fn next_key(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed).saturating_add(1)
    }

    /// Most recently issued key, 0 when none has been issued.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

///
/// UserSession
///

pub struct UserSession {
    user: String,
    permissions: Arc<dyn PermissionChecker>,
    query_keys: QueryKeySequence,
}

impl UserSession {
    pub fn new(user: impl Into<String>, permissions: Arc<dyn PermissionChecker>) -> Self {
        Self {
            user: user.into(),
            permissions,
            query_keys: QueryKeySequence::new(),
        }
    }

    /// Session whose permission checker allows everything.
    pub fn permit_all(user: impl Into<String>) -> Self {
        Self::new(user, Arc::new(PermitAll))
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub const fn query_keys(&self) -> &QueryKeySequence {
        &self.query_keys
    }

    #[must_use]
    pub fn is_entity_op_permitted(&self, entity_name: &str, op: EntityOp) -> bool {
        self.permissions.is_entity_op_permitted(entity_name, op)
    }

    #[must_use]
    pub fn is_read_permitted(&self, entity_name: &str) -> bool {
        self.is_entity_op_permitted(entity_name, EntityOp::Read)
    }
}

impl fmt::Debug for UserSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSession")
            .field("user", &self.user)
            .field("query_key", &self.query_keys.current())
            .finish_non_exhaustive()
    }
}
