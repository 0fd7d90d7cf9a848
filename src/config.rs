//! Query engine configuration.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tunables for criteria building.
///
/// Hosts load this however they like; every field has a default.
///
/// ```rust
/// use openbis_query::QueryConfig;
///
/// let config: QueryConfig = serde_json::from_str(r#"{ "maxIdsPerSearch": 25 }"#).unwrap();
/// assert_eq!(config.max_ids_per_search, 25);
/// assert!(config.is_any_property("ANY"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryConfig {
    /// Identifier-set searches are split into chunks of at most this many ids.
    pub max_ids_per_search: usize,
    /// Property names meaning "unspecified", matched case-insensitively
    /// with surrounding whitespace ignored on both sides.
    pub any_property_placeholders: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_ids_per_search: 100,
            any_property_placeholders: vec!["any".into(), "any_property".into()],
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_ids_per_search == 0 {
            return Err(Error::ConfigError("max_ids_per_search must be at least 1".into()));
        }
        if self.any_property_placeholders.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::ConfigError(
                "any_property_placeholders must not contain empty names".into(),
            ));
        }
        Ok(())
    }

    /// True if `property` is one of the "unspecified" placeholders.
    pub fn is_any_property(&self, property: &str) -> bool {
        let property = property.trim();
        self.any_property_placeholders
            .iter()
            .any(|p| p.trim().eq_ignore_ascii_case(property))
    }
}
