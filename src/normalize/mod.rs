//! Result normalizer.
//!
//! Turns raw search records into the nested shape consumers read:
//! identifiers, registrator and a flattened property map on every entity,
//! the single owning parent on datasets, and the content lists on spaces.
//! Records keep the order the transport returned them in.

use crate::model::{EntityType, NormalizedEntity, NormalizedResult, RawEntity};
use crate::{Error, Result};

/// Normalize the records of one search into a result fragment.
///
/// An empty input yields an empty result, with no key for the kind.
pub fn normalize(entity_type: EntityType, records: Vec<RawEntity>) -> Result<NormalizedResult> {
    let entities = records
        .into_iter()
        .map(|raw| normalize_entity(entity_type, raw))
        .collect::<Result<Vec<_>>>()?;

    let mut result = NormalizedResult::new();
    result.insert(entity_type, entities);
    Ok(result)
}

/// Normalize a single record.
pub fn normalize_entity(entity_type: EntityType, raw: RawEntity) -> Result<NormalizedEntity> {
    let mut entity = NormalizedEntity {
        perm_id: raw.perm_id,
        code: raw.code,
        description: raw.description,
        type_code: raw.type_code,
        registerator: raw.registrator,
        registration_date: raw.registration_date,
        properties: (!raw.properties.is_empty()).then_some(raw.properties),
        ..Default::default()
    };

    match entity_type {
        EntityType::DataSet => {
            // A dataset hangs off a sample or an experiment. When the
            // server reports both, the sample is the direct owner.
            match (raw.sample, raw.experiment) {
                (Some(sample), _) => entity.sample = Some(sample),
                (None, Some(experiment)) => entity.experiment = Some(experiment),
                (None, None) => {
                    tracing::warn!(perm_id = %entity.perm_id, "dataset has no sample or experiment");
                    return Err(Error::MissingParent { perm_id: entity.perm_id });
                }
            }
        }
        EntityType::Space => {
            entity.experiments = Some(raw.experiments);
            entity.projects = Some(raw.projects);
            entity.datasets = Some(raw.datasets);
        }
        EntityType::Experiment
        | EntityType::Sample
        | EntityType::Project
        | EntityType::SampleType
        | EntityType::DataSetType => {}
    }

    Ok(entity)
}
