//! Query options — the declarative input of a single query call.
//!
//! `QueryOptions` is the typed form: one `QueryMode` variant per query
//! type, each carrying only its own fields. `RawQueryOptions` mirrors the
//! loose option bags host applications pass around (JSON, form data) and
//! converts into the typed form, failing on unknown entity or query types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EntityType, QueryType};
use crate::{Error, Result};

/// Attribute an ATTRIBUTE query matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// Permanent identifier.
    PermId,
    Code,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::PermId => f.write_str("PermID"),
            Attribute::Code => f.write_str("Code"),
        }
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permid" | "perm_id" => Ok(Attribute::PermId),
            "code" => Ok(Attribute::Code),
            _ => Err(Error::InvalidQuery(format!("unsupported attribute '{s}'"))),
        }
    }
}

/// Mode-specific fields of a query.
///
/// Required fields are optional here on purpose: whether they are present
/// is checked when criteria are built, after the short-circuit rules ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    Property {
        property: String,
        value: Option<String>,
    },
    Attribute {
        attribute: Attribute,
        /// Empty means "match all"; otherwise a comma-separated id list.
        value: String,
    },
    Semantic {
        predicate_accession_id: Option<String>,
        descriptor_accession_id: Option<String>,
    },
    Type {
        type_code: Option<String>,
    },
    All,
}

impl QueryMode {
    pub fn query_type(&self) -> QueryType {
        match self {
            QueryMode::Property { .. } => QueryType::Property,
            QueryMode::Attribute { .. } => QueryType::Attribute,
            QueryMode::Semantic { .. } => QueryType::Semantic,
            QueryMode::Type { .. } => QueryType::Type,
            QueryMode::All => QueryType::All,
        }
    }
}

/// A fully typed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub entity_type: EntityType,
    pub mode: QueryMode,
}

impl QueryOptions {
    pub fn new(entity_type: EntityType, mode: QueryMode) -> Self {
        Self { entity_type, mode }
    }

    pub fn all(entity_type: EntityType) -> Self {
        Self::new(entity_type, QueryMode::All)
    }

    pub fn property(
        entity_type: EntityType,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(
            entity_type,
            QueryMode::Property {
                property: property.into(),
                value: Some(value.into()),
            },
        )
    }

    pub fn perm_ids(entity_type: EntityType, value: impl Into<String>) -> Self {
        Self::new(
            entity_type,
            QueryMode::Attribute {
                attribute: Attribute::PermId,
                value: value.into(),
            },
        )
    }

    pub fn codes(entity_type: EntityType, value: impl Into<String>) -> Self {
        Self::new(
            entity_type,
            QueryMode::Attribute {
                attribute: Attribute::Code,
                value: value.into(),
            },
        )
    }

    pub fn semantic(
        entity_type: EntityType,
        predicate_accession_id: impl Into<String>,
        descriptor_accession_id: impl Into<String>,
    ) -> Self {
        Self::new(
            entity_type,
            QueryMode::Semantic {
                predicate_accession_id: Some(predicate_accession_id.into()),
                descriptor_accession_id: Some(descriptor_accession_id.into()),
            },
        )
    }

    pub fn of_type(entity_type: EntityType, type_code: impl Into<String>) -> Self {
        Self::new(
            entity_type,
            QueryMode::Type {
                type_code: Some(type_code.into()),
            },
        )
    }

    pub fn query_type(&self) -> QueryType {
        self.mode.query_type()
    }
}

/// Loosely typed option bag, as host applications hold it.
///
/// ```json
/// { "entityType": "Space", "queryType": "ATTRIBUTE",
///   "attribute": "PermID", "attributeValue": "" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQueryOptions {
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub query_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate_accession_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor_accession_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<String>,
}

impl TryFrom<RawQueryOptions> for QueryOptions {
    type Error = Error;

    fn try_from(raw: RawQueryOptions) -> Result<Self> {
        let entity_type: EntityType = raw.entity_type.parse()?;
        let query_type: QueryType = raw.query_type.parse()?;

        let mode = match query_type {
            QueryType::Property => QueryMode::Property {
                property: raw.property.unwrap_or_default(),
                value: raw.property_value,
            },
            QueryType::Attribute => QueryMode::Attribute {
                attribute: match raw.attribute.as_deref() {
                    Some(name) if !name.trim().is_empty() => name.parse()?,
                    _ => Attribute::PermId,
                },
                value: raw.attribute_value.unwrap_or_default(),
            },
            QueryType::Semantic => QueryMode::Semantic {
                predicate_accession_id: raw.predicate_accession_id,
                descriptor_accession_id: raw.descriptor_accession_id,
            },
            QueryType::Type => QueryMode::Type {
                type_code: raw.type_code,
            },
            QueryType::All => QueryMode::All,
        };

        Ok(QueryOptions { entity_type, mode })
    }
}

impl TryFrom<&serde_json::Value> for QueryOptions {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        let raw: RawQueryOptions = serde_json::from_value(value.clone())?;
        raw.try_into()
    }
}
