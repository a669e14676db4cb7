//! Query context building: what a datasource asks its load service for.

mod context;
mod sort;

#[cfg(test)]
mod tests;

pub use context::{LoadContext, LoadContextBuilder, LoadQuery};
pub use sort::{SortDirection, SortError, SortInfo};

pub(crate) use sort::single_sort_field;
