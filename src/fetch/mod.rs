//! Entity fetcher — runs search criteria against a transport.
//!
//! Each entity kind is searched with its own fetch options, so the
//! records come back carrying exactly the relationships the normalizer
//! reads. The fetcher never filters or reshapes what the transport
//! returns, and transport errors pass through untouched.

use serde::{Deserialize, Serialize};

use crate::criteria::SearchCriteria;
use crate::model::{EntityType, RawEntity};
use crate::transport::{SearchTransport, SessionToken};
use crate::Result;

/// Related data a search should include with each record.
///
/// All fields default to false; use [`FetchOptions::for_entity`] for the
/// set each entity kind needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOptions {
    pub properties: bool,
    pub registrator: bool,
    pub entity_type: bool,
    pub sample: bool,
    pub experiment: bool,
    pub parents: bool,
    pub containers: bool,
    pub data_store: bool,
    /// Experiments, projects and datasets contained in a space.
    pub space_contents: bool,
    /// Semantic annotations and other type-level metadata.
    pub type_metadata: bool,
}

impl FetchOptions {
    pub fn for_entity(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Experiment => Self {
                properties: true,
                registrator: true,
                entity_type: true,
                ..Self::default()
            },
            EntityType::Sample => Self {
                properties: true,
                registrator: true,
                entity_type: true,
                experiment: true,
                parents: true,
                ..Self::default()
            },
            EntityType::DataSet => Self {
                properties: true,
                registrator: true,
                entity_type: true,
                sample: true,
                experiment: true,
                parents: true,
                containers: true,
                data_store: true,
                ..Self::default()
            },
            EntityType::Space => Self {
                registrator: true,
                space_contents: true,
                ..Self::default()
            },
            EntityType::Project => Self {
                registrator: true,
                ..Self::default()
            },
            EntityType::SampleType | EntityType::DataSetType => Self {
                type_metadata: true,
                ..Self::default()
            },
        }
    }

    /// Clear every field of `entity` these options did not ask for.
    pub fn restrict(&self, mut entity: RawEntity) -> RawEntity {
        if !self.properties {
            entity.properties.clear();
        }
        if !self.registrator {
            entity.registrator = None;
            entity.registration_date = None;
        }
        if !self.entity_type {
            entity.type_code = None;
        }
        if !self.sample {
            entity.sample = None;
        }
        if !self.experiment {
            entity.experiment = None;
        }
        if !self.parents {
            entity.parents.clear();
        }
        if !self.containers {
            entity.containers.clear();
        }
        if !self.data_store {
            entity.data_store = None;
        }
        if !self.space_contents {
            entity.experiments.clear();
            entity.projects.clear();
            entity.datasets.clear();
        }
        if !self.type_metadata {
            entity.semantic_annotations.clear();
        }
        entity
    }
}

/// Run one remote search for `criteria`.
pub async fn fetch<T: SearchTransport + ?Sized>(
    transport: &T,
    entity_type: EntityType,
    criteria: &SearchCriteria,
    token: &SessionToken,
) -> Result<Vec<RawEntity>> {
    let fetch_options = FetchOptions::for_entity(entity_type);
    let entities = transport
        .search(entity_type, criteria, &fetch_options, token)
        .await?;
    tracing::trace!(
        entity_type = %entity_type,
        criteria = %criteria,
        rows = entities.len(),
        "remote search returned"
    );
    Ok(entities)
}

/// Run several searches in order and concatenate their records.
///
/// Order is the transport's return order, search by search; nothing is
/// sorted or deduplicated.
pub async fn fetch_all<T: SearchTransport + ?Sized>(
    transport: &T,
    entity_type: EntityType,
    criteria: &[SearchCriteria],
    token: &SessionToken,
) -> Result<Vec<RawEntity>> {
    let mut merged = Vec::new();
    for c in criteria {
        merged.extend(fetch(transport, entity_type, c, token).await?);
    }
    Ok(merged)
}
