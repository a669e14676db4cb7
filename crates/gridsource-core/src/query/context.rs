use crate::{
    filter::{Condition, Filter, Params},
    query::SortInfo,
};
use serde::{Deserialize, Serialize};

///
/// LoadQuery
///
/// The query half of a load request: bound filter, the parameters it
/// referenced, optional server-side sort, and paging window.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct LoadQuery {
    pub filter: Option<Condition>,
    pub parameters: Params,
    pub sort: Option<SortInfo>,
    pub first_result: Option<usize>,
    pub max_results: Option<usize>,
}

impl LoadQuery {
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.first_result.is_some() || self.max_results.is_some()
    }
}

///
/// LoadContext
///
/// Complete load request handed to the load service.
///
/// `query_key` and `prev_queries` carry the pinned query history so the
/// backend can keep paging stable relative to the originating base query.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LoadContext {
    pub entity_name: String,
    pub query: LoadQuery,
    pub view: Option<String>,
    pub soft_deletion: bool,
    pub query_key: u64,
    pub prev_queries: Vec<LoadQuery>,
}

///
/// LoadContextBuilder
///
/// Builds a [`LoadContext`] from datasource state and caller parameters.
/// `build` returns `None` when the filter denies everything, meaning no load
/// should occur at all.
///

#[derive(Clone, Debug)]
pub struct LoadContextBuilder<'a> {
    entity_name: &'a str,
    filter: Option<&'a Filter>,
    params: Option<&'a Params>,
    sort: Option<&'a SortInfo>,
    sort_on_backend: bool,
    first_result: usize,
    max_results: usize,
    view: Option<&'a str>,
    soft_deletion: bool,
    query_key: Option<u64>,
    prev_queries: &'a [LoadQuery],
}

impl<'a> LoadContextBuilder<'a> {
    #[must_use]
    pub const fn new(entity_name: &'a str) -> Self {
        Self {
            entity_name,
            filter: None,
            params: None,
            sort: None,
            sort_on_backend: false,
            first_result: 0,
            max_results: 0,
            view: None,
            soft_deletion: true,
            query_key: None,
            prev_queries: &[],
        }
    }

    #[must_use]
    pub const fn filter(mut self, filter: Option<&'a Filter>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub const fn params(mut self, params: &'a Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Sort is only shipped to the backend when `sort_on_backend` is set.
    #[must_use]
    pub const fn sort(mut self, sort: Option<&'a SortInfo>, sort_on_backend: bool) -> Self {
        self.sort = sort;
        self.sort_on_backend = sort_on_backend;
        self
    }

    /// Paging window; zero means "not set" for either bound.
    #[must_use]
    pub const fn page(mut self, first_result: usize, max_results: usize) -> Self {
        self.first_result = first_result;
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub const fn view(mut self, view: Option<&'a str>) -> Self {
        self.view = view;
        self
    }

    #[must_use]
    pub const fn soft_deletion(mut self, soft_deletion: bool) -> Self {
        self.soft_deletion = soft_deletion;
        self
    }

    /// Pinned query history; a missing key is sent as 0.
    #[must_use]
    pub const fn history(mut self, query_key: Option<u64>, prev_queries: &'a [LoadQuery]) -> Self {
        self.query_key = query_key;
        self.prev_queries = prev_queries;
        self
    }

    /// Build the load request, or `None` when the filter denies everything.
    #[must_use]
    pub fn build(self) -> Option<LoadContext> {
        let empty = Params::new();
        let params = self.params.unwrap_or(&empty);

        let filter = match self.filter {
            Some(filter) if filter.is_denying() => return None,
            Some(filter) => filter.bind(params),
            None => None,
        };
        if filter.as_ref().is_some_and(Condition::denies_all) {
            return None;
        }

        // ship only the parameters the bound filter actually used
        let parameters = self
            .filter
            .map(|filter| filter.root().parameters())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|name| params.get(&name).cloned().map(|value| (name, value)))
            .collect();

        let query = LoadQuery {
            filter,
            parameters,
            sort: self.sort.filter(|_| self.sort_on_backend).cloned(),
            first_result: (self.first_result > 0).then_some(self.first_result),
            max_results: (self.max_results > 0).then_some(self.max_results),
        };

        Some(LoadContext {
            entity_name: self.entity_name.to_string(),
            query,
            view: self.view.map(str::to_string),
            soft_deletion: self.soft_deletion,
            query_key: self.query_key.unwrap_or(0),
            prev_queries: self.prev_queries.to_vec(),
        })
    }
}
