use serde::{Deserialize, Serialize};
use std::fmt;

///
/// DatasourceState
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DatasourceState {
    #[default]
    NotInitialized,
    Valid,
    Invalid,
}

impl DatasourceState {
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for DatasourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotInitialized => "not_initialized",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        };
        write!(f, "{label}")
    }
}

///
/// RefreshMode
///
/// `Never` turns refresh into a local re-validation that never reaches the
/// load service.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    #[default]
    Always,
    Never,
}
