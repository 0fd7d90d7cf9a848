//! Raw entity records as the Application Server returns them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Property bag: property code → value, names kept verbatim.
pub type PropertyMap = BTreeMap<String, String>;

/// Ontology annotation attached to a sample or dataset type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticAnnotation {
    pub predicate_accession_id: String,
    pub descriptor_accession_id: String,
}

impl SemanticAnnotation {
    pub fn new(predicate: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            predicate_accession_id: predicate.into(),
            descriptor_accession_id: descriptor.into(),
        }
    }
}

/// One record returned by a remote search.
///
/// Which relationship fields are populated depends on the entity kind and
/// on the fetch options the search was issued with; anything not fetched
/// is left `None` / empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEntity {
    pub perm_id: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub type_code: Option<String>,
    pub registrator: Option<String>,
    pub registration_date: Option<DateTime<Utc>>,
    pub properties: PropertyMap,

    // DataSet / Sample parents
    pub sample: Option<String>,
    pub experiment: Option<String>,
    pub parents: Vec<String>,
    pub containers: Vec<String>,
    pub data_store: Option<String>,

    // Space contents
    pub experiments: Vec<String>,
    pub projects: Vec<String>,
    pub datasets: Vec<String>,

    // Type metadata
    pub semantic_annotations: Vec<SemanticAnnotation>,
}

impl RawEntity {
    pub fn new(perm_id: impl Into<String>) -> Self {
        Self {
            perm_id: perm_id.into(),
            ..Default::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type_code(mut self, type_code: impl Into<String>) -> Self {
        self.type_code = Some(type_code.into());
        self
    }

    pub fn with_registrator(mut self, registrator: impl Into<String>) -> Self {
        self.registrator = Some(registrator.into());
        self
    }

    pub fn with_registration_date(mut self, date: DateTime<Utc>) -> Self {
        self.registration_date = Some(date);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_sample(mut self, perm_id: impl Into<String>) -> Self {
        self.sample = Some(perm_id.into());
        self
    }

    pub fn with_experiment(mut self, perm_id: impl Into<String>) -> Self {
        self.experiment = Some(perm_id.into());
        self
    }

    pub fn with_parent(mut self, perm_id: impl Into<String>) -> Self {
        self.parents.push(perm_id.into());
        self
    }

    pub fn with_data_store(mut self, code: impl Into<String>) -> Self {
        self.data_store = Some(code.into());
        self
    }

    pub fn with_contents(
        mut self,
        experiments: impl IntoIterator<Item = impl Into<String>>,
        projects: impl IntoIterator<Item = impl Into<String>>,
        datasets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.experiments = experiments.into_iter().map(Into::into).collect();
        self.projects = projects.into_iter().map(Into::into).collect();
        self.datasets = datasets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_annotation(mut self, annotation: SemanticAnnotation) -> Self {
        self.semantic_annotations.push(annotation);
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
