use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// PropertyPath
///
/// Dotted path addressing a property, either directly on an entity (`name`)
/// or through associations (`customer.address.city`).
/// Parsed paths never contain an empty segment; [`PropertyPath::new`] and
/// the `From<&str>` fallback keep their input as one raw segment.
///

#[derive(Clone, Debug, Deref, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyPath {
    #[deref]
    segments: Vec<String>,
}

impl PropertyPath {
    /// Build a single-segment path.
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            segments: vec![property.into()],
        }
    }

    /// Parse a dotted path; returns `None` for empty input or empty segments.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }

        Some(Self { segments })
    }

    /// True when the path names a direct property of the entity.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.segments.len() == 1
    }

    /// First segment: the property read on the root entity.
    #[must_use]
    pub fn head(&self) -> &str {
        // segments is never empty
        self.segments.first().map_or("", String::as_str)
    }

    /// Remaining path below the first segment, if any.
    #[must_use]
    pub fn tail(&self) -> Option<Self> {
        (!self.is_direct()).then(|| Self {
            segments: self.segments[1..].to_vec(),
        })
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

///
/// PropertyPathError
///

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid property path '{0}'")]
pub struct PropertyPathError(pub String);

impl FromStr for PropertyPath {
    type Err = PropertyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| PropertyPathError(s.to_string()))
    }
}

impl TryFrom<String> for PropertyPath {
    type Error = PropertyPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PropertyPath> for String {
    fn from(path: PropertyPath) -> Self {
        path.to_string()
    }
}

impl From<&str> for PropertyPath {
    /// Infallible convenience for literals: a malformed literal degrades to a
    /// single-segment path holding the raw text.
    fn from(path: &str) -> Self {
        Self::parse(path).unwrap_or_else(|| Self::new(path))
    }
}
