use crate::{
    aggregate::AggregateError, config::ConfigError, datasource::DatasourceError,
    query::SortError, service::LoadError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable classification.
/// Every public datasource operation reports failures through this type.
///

#[derive(Clone, Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without a detail payload.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a sort-origin unsupported error.
    pub(crate) fn sort_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Sort, message.into())
    }

    /// Construct an aggregate-origin unsupported error.
    pub(crate) fn aggregate_unsupported(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Aggregate,
            message.into(),
        )
    }

    /// Return the captured load failure, if this error carries one.
    #[must_use]
    pub const fn load_error(&self) -> Option<&LoadError> {
        match &self.detail {
            Some(ErrorDetail::Load(err)) => Some(err),
            None => None,
        }
    }

    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self.class, ErrorClass::InvalidState)
    }

    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.class, ErrorClass::Unsupported)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Clone, Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Load(LoadError),
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Config,
    InvalidState,
    Load,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::InvalidState => "invalid_state",
            Self::Load => "load",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Aggregate,
    Config,
    Datasource,
    Load,
    Sort,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Aggregate => "aggregate",
            Self::Config => "config",
            Self::Datasource => "datasource",
            Self::Load => "load",
            Self::Sort => "sort",
        };
        write!(f, "{label}")
    }
}

///
/// CONVERSIONS
///

impl From<LoadError> for InternalError {
    fn from(err: LoadError) -> Self {
        Self {
            class: ErrorClass::Load,
            origin: ErrorOrigin::Load,
            message: err.to_string(),
            detail: Some(ErrorDetail::Load(err)),
        }
    }
}

impl From<DatasourceError> for InternalError {
    fn from(err: DatasourceError) -> Self {
        Self::new(
            ErrorClass::InvalidState,
            ErrorOrigin::Datasource,
            err.to_string(),
        )
    }
}

impl From<SortError> for InternalError {
    fn from(err: SortError) -> Self {
        Self::sort_unsupported(err.to_string())
    }
}

impl From<AggregateError> for InternalError {
    fn from(err: AggregateError) -> Self {
        Self::aggregate_unsupported(err.to_string())
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Config, ErrorOrigin::Config, err.to_string())
    }
}
