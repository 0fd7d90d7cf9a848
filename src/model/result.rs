//! Normalized, consumer-facing query output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityType, PropertyMap};

/// One entity after normalization.
///
/// Serializes to the nested map shape consumers expect: `permId`, `code`,
/// `registerator`, a `properties` sub-map, and the relationship lists that
/// apply to the entity kind. Absent fields are omitted, not `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntity {
    pub perm_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registerator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,

    /// DataSet only: owning sample. Mutually exclusive with `experiment`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
    /// DataSet only: owning experiment. Mutually exclusive with `sample`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment: Option<String>,

    // Space only; always `Some` for spaces, possibly empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<String>>,
}

impl NormalizedEntity {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.as_ref()?.get(key).map(String::as_str)
    }
}

/// Result of a query: result key → entities, in remote return order.
///
/// A key is only present when at least one entity matched, so an empty
/// result is an empty map. Use [`NormalizedResult::entities`] to read a
/// kind without caring whether its key exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedResult {
    entries: BTreeMap<String, Vec<NormalizedEntity>>,
}

impl NormalizedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entities under the kind's key. Empty batches add no key.
    pub fn insert(&mut self, entity_type: EntityType, entities: Vec<NormalizedEntity>) {
        if entities.is_empty() {
            return;
        }
        self.entries
            .entry(entity_type.result_key().to_string())
            .or_default()
            .extend(entities);
    }

    /// Entities under a raw result key, e.g. `"spaces"`.
    pub fn get(&self, key: &str) -> Option<&[NormalizedEntity]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Entities of a kind; empty when the key is absent.
    pub fn entities(&self, entity_type: EntityType) -> &[NormalizedEntity] {
        self.get(entity_type.result_key()).unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
