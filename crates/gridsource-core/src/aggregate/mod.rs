//! Module: aggregate
//! Responsibility: aggregate values (count/sum/avg/min/max) over a subset of
//! datasource items, formatted for display in table footers.
//! Does not own: item lookup; callers supply an [`ItemResolver`].

#[cfg(test)]
mod tests;

use crate::{
    model::PropertyPath,
    value::{Value, canonical_cmp},
};
use indexmap::IndexMap;
use std::fmt;
use thiserror::Error as ThisError;

///
/// AggregateKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AggregateKind {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateKind {
    /// Return whether this kind only accepts numeric inputs.
    #[must_use]
    pub const fn requires_numeric(self) -> bool {
        matches!(self, Self::Sum | Self::Avg)
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        };
        write!(f, "{label}")
    }
}

///
/// AggregationSpec
///
/// One aggregate column: property, function and optional fixed float
/// precision for the formatted output.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AggregationSpec {
    pub property: PropertyPath,
    pub kind: AggregateKind,
    pub precision: Option<usize>,
}

impl AggregationSpec {
    #[must_use]
    pub fn new(property: impl Into<PropertyPath>, kind: AggregateKind) -> Self {
        Self {
            property: property.into(),
            kind,
            precision: None,
        }
    }

    #[must_use]
    pub const fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }
}

///
/// AggregateError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AggregateError {
    #[error("cannot {kind} non-numeric value '{value}' of property '{property}'")]
    NonNumeric {
        kind: AggregateKind,
        property: String,
        value: String,
    },
}

///
/// ItemResolver
///
/// Narrow lookup capability the aggregation delegate needs from its owner.
///

pub trait ItemResolver<K> {
    /// Property value of the item stored under `key`, or `None` when no such
    /// item exists.
    fn item_value(&self, key: &K, property: &PropertyPath) -> Option<Value>;
}

///
/// AggregatableDelegate
///
/// Computes aggregates for a set of item keys, resolving values through an
/// [`ItemResolver`]. Unknown keys and `Null` values are skipped.
///

pub struct AggregatableDelegate<'a, R> {
    resolver: &'a R,
}

impl<'a, R> AggregatableDelegate<'a, R> {
    pub const fn new(resolver: &'a R) -> Self {
        Self { resolver }
    }

    /// Aggregate every spec over `keys`, returning formatted results in spec
    /// order.
    pub fn aggregate<K>(
        &self,
        specs: &[AggregationSpec],
        keys: &[K],
    ) -> Result<IndexMap<AggregationSpec, String>, AggregateError>
    where
        R: ItemResolver<K>,
    {
        let mut results = IndexMap::with_capacity(specs.len());

        for spec in specs {
            let values: Vec<Value> = keys
                .iter()
                .filter_map(|key| self.resolver.item_value(key, &spec.property))
                .filter(|value| !value.is_null())
                .collect();

            let value = compute(spec, &values)?;
            results.insert(spec.clone(), format_value(&value, spec.precision));
        }

        Ok(results)
    }
}

/// Compute one aggregate over non-null values.
fn compute(spec: &AggregationSpec, values: &[Value]) -> Result<Value, AggregateError> {
    if spec.kind.requires_numeric()
        && let Some(bad) = values.iter().find(|value| !value.is_numeric())
    {
        return Err(AggregateError::NonNumeric {
            kind: spec.kind,
            property: spec.property.to_string(),
            value: bad.to_string(),
        });
    }

    let value = match spec.kind {
        AggregateKind::Count => Value::Uint(u64::try_from(values.len()).unwrap_or(u64::MAX)),
        AggregateKind::Sum => sum(values),
        AggregateKind::Avg => avg(values),
        AggregateKind::Min => values
            .iter()
            .min_by(|a, b| canonical_cmp(a, b))
            .cloned()
            .unwrap_or_default(),
        AggregateKind::Max => values
            .iter()
            .max_by(|a, b| canonical_cmp(a, b))
            .cloned()
            .unwrap_or_default(),
    };

    Ok(value)
}

// Integral inputs stay integral; any float promotes the whole sum.
fn sum(values: &[Value]) -> Value {
    if values.is_empty() {
        return Value::Null;
    }

    if values.iter().all(Value::is_integral) {
        let total: i128 = values.iter().filter_map(Value::as_i128).sum();
        if let Ok(v) = i64::try_from(total) {
            return Value::Int(v);
        }
        if let Ok(v) = u64::try_from(total) {
            return Value::Uint(v);
        }
    }

    Value::Float(values.iter().filter_map(Value::as_f64).sum())
}

#[allow(clippy::cast_precision_loss)]
fn avg(values: &[Value]) -> Value {
    if values.is_empty() {
        return Value::Null;
    }

    let total: f64 = values.iter().filter_map(Value::as_f64).sum();
    Value::Float(total / values.len() as f64)
}

fn format_value(value: &Value, precision: Option<usize>) -> String {
    match (value, precision) {
        (Value::Float(v), Some(precision)) => format!("{v:.precision$}"),
        _ => value.to_string(),
    }
}
