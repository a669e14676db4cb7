mod compare;
mod rank;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

// re-exports
pub use compare::{canonical_cmp, strict_order_cmp};

///
/// Value
///
/// Dynamically typed property value read from an entity.
///
/// Null        → the property is unset (absent association, empty column).
/// Timestamp   → milliseconds since the unix epoch.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Float(f64),
    Int(i64),
    /// Ordered list of values.
    /// Used for to-many properties; list order is preserved.
    List(Vec<Self>),
    #[default]
    Null,
    Text(String),
    Timestamp(i64),
    Uint(u64),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    pub fn from_list<T>(items: Vec<T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    ///
    /// TYPES
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for the variants that take part in numeric comparison
    /// and arithmetic aggregation.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Float(_) | Self::Int(_) | Self::Uint(_))
    }

    /// Returns true for integral numeric variants.
    #[must_use]
    pub const fn is_integral(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Uint(_))
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Widen an integral value into `i128` for overflow-free arithmetic.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Int(v) => Some(i128::from(*v)),
            Self::Uint(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    /// Lossy numeric view used by float arithmetic.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Uint(v) => Some(*v as f64),
            _ => None,
        }
    }

    ///
    /// COMPARISON
    ///

    /// Stable canonical rank used by all cross-variant ordering surfaces.
    #[must_use]
    pub const fn canonical_rank(&self) -> u8 {
        rank::canonical_rank(self)
    }

    /// Compare two numeric values across integral and float variants.
    ///
    /// Returns `None` when either side is not numeric or a float is NaN.
    #[must_use]
    pub fn cmp_numeric(&self, other: &Self) -> Option<Ordering> {
        if let (Some(left), Some(right)) = (self.as_i128(), other.as_i128()) {
            return Some(left.cmp(&right));
        }

        let left = self.as_f64()?;
        let right = other.as_f64()?;
        left.partial_cmp(&right)
    }

    /// Case-sensitive substring test used by `Contains` filters.
    #[must_use]
    pub fn text_contains(&self, needle: &Self) -> Option<bool> {
        Some(self.as_text()?.contains(needle.as_text()?))
    }

    #[must_use]
    pub fn text_starts_with(&self, needle: &Self) -> Option<bool> {
        Some(self.as_text()?.starts_with(needle.as_text()?))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) | Self::Timestamp(v) => write!(f, "{v}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Null => Ok(()),
            Self::Text(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
        }
    }
}

///
/// CONVERSIONS
///

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
