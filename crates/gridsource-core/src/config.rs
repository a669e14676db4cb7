//! Datasource configuration: defaults applied to every collection datasource,
//! loadable from TOML.

use crate::datasource::RefreshMode;
use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid datasource config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// DatasourceConfig
///
/// ```toml
/// sort_on_backend = true
/// max_results = 50
/// refresh_mode = "always"
/// soft_deletion = true
/// view = "order.browse"
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatasourceConfig {
    /// Delegate ordering to the backend query when the cache may be partial.
    pub sort_on_backend: bool,

    /// Page size; 0 loads everything.
    pub max_results: usize,

    pub refresh_mode: RefreshMode,

    /// Exclude soft-deleted rows from loads.
    pub soft_deletion: bool,

    /// Server-side view (projection) name.
    pub view: Option<String>,
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            sort_on_backend: true,
            max_results: 0,
            refresh_mode: RefreshMode::Always,
            soft_deletion: true,
            view: None,
        }
    }
}

impl DatasourceConfig {
    /// Parse a config from TOML; omitted keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = DatasourceConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, DatasourceConfig::default());
        assert!(config.sort_on_backend);
        assert!(config.soft_deletion);
    }

    #[test]
    fn toml_overrides_selected_fields() {
        let config = DatasourceConfig::from_toml_str(
            r#"
            max_results = 25
            refresh_mode = "never"
            view = "order.browse"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.max_results, 25);
        assert_eq!(config.refresh_mode, RefreshMode::Never);
        assert_eq!(config.view.as_deref(), Some("order.browse"));
        assert!(config.sort_on_backend, "unset keys keep defaults");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = DatasourceConfig::from_toml_str("page_size = 10")
            .expect_err("unknown key must be rejected");

        assert!(err.to_string().contains("invalid datasource config"));
    }
}
