use crate::{datasource::CollectionDatasource, query::LoadQuery, traits::EntityKind};

impl<E: EntityKind> CollectionDatasource<E> {
    #[must_use]
    pub fn first_result(&self) -> usize {
        self.inner.lock().first_result
    }

    pub fn set_first_result(&self, first_result: usize) {
        self.inner.lock().first_result = first_result;
    }

    /// Page size; 0 means unbounded.
    #[must_use]
    pub fn max_results(&self) -> usize {
        self.inner.lock().config.max_results
    }

    pub fn set_max_results(&self, max_results: usize) {
        self.inner.lock().config.max_results = max_results;
    }

    /// Query sent by the last successful load.
    #[must_use]
    pub fn last_query(&self) -> Option<LoadQuery> {
        self.inner.lock().last_query.clone()
    }

    #[must_use]
    pub fn prev_queries(&self) -> Vec<LoadQuery> {
        self.inner.lock().prev_queries.clone()
    }

    /// Key of the pinned query chain; `None` until the first pin.
    #[must_use]
    pub fn query_key(&self) -> Option<u64> {
        self.inner.lock().query_key
    }

    /// Pin the last executed query as a paging anchor. Starting a new chain
    /// takes a fresh key from the session.
    pub fn pin_query(&self) {
        let mut inner = self.inner.lock();
        if inner.prev_queries.is_empty() {
            inner.query_key = Some(self.session.query_keys().next_key());
        }
        if let Some(query) = inner.last_query.clone() {
            inner.prev_queries.push(query);
        }
    }

    pub fn unpin_last_query(&self) {
        self.inner.lock().prev_queries.pop();
    }

    pub fn unpin_all_queries(&self) {
        self.inner.lock().prev_queries.clear();
    }
}
