use crate::{datasource::CollectionDatasource, error::InternalError, traits::EntityKind};

impl<E: EntityKind> CollectionDatasource<E> {
    /// Refresh now, or while suspended mark the data valid and owe one
    /// refresh for when the datasource resumes.
    pub fn refresh_if_not_suspended(&self) -> Result<(), InternalError> {
        self.locked(|inner, events| {
            if inner.suspended {
                Self::valid_locked(inner, events);
                inner.refresh_owed = true;

                Ok(())
            } else {
                self.refresh_locked(inner, events, None)
            }
        })
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.inner.lock().suspended
    }

    /// Suspend or resume. Resuming runs the owed refresh, if any.
    pub fn set_suspended(&self, suspended: bool) -> Result<(), InternalError> {
        self.locked(|inner, events| {
            let was_suspended = std::mem::replace(&mut inner.suspended, suspended);

            if was_suspended && !suspended && inner.refresh_owed {
                tracing::debug!(
                    datasource = %self.id,
                    entity = E::ENTITY_NAME,
                    "resumed with a refresh owed"
                );
                return self.refresh_locked(inner, events, None);
            }

            Ok(())
        })
    }
}
