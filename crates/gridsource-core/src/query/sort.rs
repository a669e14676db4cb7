use crate::{
    model::PropertyPath,
    traits::EntityKind,
    value::{Value, canonical_cmp},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error as ThisError;

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

///
/// SortInfo
///
/// One sort field plus direction. Datasources hold at most one.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct SortInfo {
    pub property: PropertyPath,
    pub direction: SortDirection,
}

impl SortInfo {
    #[must_use]
    pub fn asc(property: impl Into<PropertyPath>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Asc,
        }
    }

    #[must_use]
    pub fn desc(property: impl Into<PropertyPath>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Total-order comparator over entities for in-memory sorting.
    ///
    /// Values compare canonically (`Null` lowest); descending reverses.
    pub fn comparator<E: EntityKind>(&self) -> impl Fn(&E, &E) -> Ordering + '_ {
        move |left, right| {
            let left: Value = left.get_value_ex(&self.property);
            let right: Value = right.get_value_ex(&self.property);
            let ordering = canonical_cmp(&left, &right);

            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

///
/// SortError
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum SortError {
    #[error("sorting supports exactly one field, got {count}")]
    UnsupportedFieldCount { count: usize },
}

/// Validate a sort request: exactly one field is supported.
pub(crate) fn single_sort_field(sort_infos: &[SortInfo]) -> Result<&SortInfo, SortError> {
    match sort_infos {
        [single] => Ok(single),
        _ => Err(SortError::UnsupportedFieldCount {
            count: sort_infos.len(),
        }),
    }
}
