//! Criteria builder — turns `QueryOptions` into remote search criteria.
//!
//! The builder is transport-agnostic and pure: it validates the
//! mode-specific fields and produces a `SearchPlan`, which is either a
//! list of criteria to run in order or a short-circuit to an empty result.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::QueryConfig;
use crate::model::{Attribute, EntityType, QueryMode, QueryOptions, QueryType};
use crate::{Error, Result};

/// Predicate handed to a `SearchTransport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SearchCriteria {
    /// Named property equals a value.
    PropertyEquals { property: String, value: String },
    /// Permanent identifier is one of the set.
    PermIds { perm_ids: Vec<String> },
    /// Code is one of the set.
    Codes { codes: Vec<String> },
    /// Type-level entity carries the ontology annotation.
    SemanticAnnotation {
        predicate_accession_id: String,
        descriptor_accession_id: String,
    },
    /// Declared type code equals.
    TypeCode { type_code: String },
    /// No predicate.
    All,
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchCriteria::PropertyEquals { property, value } => {
                write!(f, "property {property} = \"{value}\"")
            }
            SearchCriteria::PermIds { perm_ids } => write!(f, "permId in [{}]", perm_ids.join(", ")),
            SearchCriteria::Codes { codes } => write!(f, "code in [{}]", codes.join(", ")),
            SearchCriteria::SemanticAnnotation {
                predicate_accession_id,
                descriptor_accession_id,
            } => write!(f, "annotation {predicate_accession_id} {descriptor_accession_id}"),
            SearchCriteria::TypeCode { type_code } => write!(f, "type = {type_code}"),
            SearchCriteria::All => write!(f, "all"),
        }
    }
}

/// What the dispatcher should do for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// Answer with an empty result without touching the transport.
    ShortCircuit,
    /// Run each criteria in order and merge the results.
    Search(Vec<SearchCriteria>),
}

/// Build the search plan for a query.
pub fn build(options: &QueryOptions, config: &QueryConfig) -> Result<SearchPlan> {
    let entity_type = options.entity_type;
    check_supported(entity_type, options.query_type())?;

    match &options.mode {
        QueryMode::Property { property, value } => {
            let property = property.trim();
            if property.is_empty() || config.is_any_property(property) {
                return Ok(SearchPlan::ShortCircuit);
            }
            let value = value.as_ref().ok_or_else(|| {
                Error::InvalidQuery(format!("PROPERTY query on '{property}' needs a propertyValue"))
            })?;
            Ok(SearchPlan::Search(vec![SearchCriteria::PropertyEquals {
                property: property.to_string(),
                value: value.clone(),
            }]))
        }

        QueryMode::Attribute { attribute, value } => {
            let ids = split_identifiers(value);
            if ids.is_empty() {
                return Ok(SearchPlan::Search(vec![SearchCriteria::All]));
            }
            let criteria = ids
                .chunks(config.max_ids_per_search.max(1))
                .map(|chunk| match attribute {
                    Attribute::PermId => SearchCriteria::PermIds { perm_ids: chunk.to_vec() },
                    Attribute::Code => SearchCriteria::Codes { codes: chunk.to_vec() },
                })
                .collect();
            Ok(SearchPlan::Search(criteria))
        }

        QueryMode::Semantic {
            predicate_accession_id,
            descriptor_accession_id,
        } => {
            let predicate = required(predicate_accession_id, "predicateAccessionId", QueryType::Semantic)?;
            let descriptor = required(descriptor_accession_id, "descriptorAccessionId", QueryType::Semantic)?;
            Ok(SearchPlan::Search(vec![SearchCriteria::SemanticAnnotation {
                predicate_accession_id: predicate,
                descriptor_accession_id: descriptor,
            }]))
        }

        QueryMode::Type { type_code } => {
            let type_code = required(type_code, "typeCode", QueryType::Type)?;
            Ok(SearchPlan::Search(vec![SearchCriteria::TypeCode { type_code }]))
        }

        QueryMode::All => Ok(SearchPlan::Search(vec![SearchCriteria::All])),
    }
}

/// Split a comma-separated identifier list.
///
/// Tokens are trimmed and empty tokens dropped. Order is kept and
/// duplicates are not removed.
pub fn split_identifiers(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reject entity/query type combinations the Application Server has no
/// search for.
fn check_supported(entity_type: EntityType, query_type: QueryType) -> Result<()> {
    let supported = match query_type {
        QueryType::Property => entity_type.has_properties(),
        QueryType::Type => entity_type.has_declared_type(),
        QueryType::Semantic => {
            if !entity_type.is_type_level() {
                return Err(Error::InvalidQuery(format!(
                    "SEMANTIC queries apply to SampleType or DataSetType, not {entity_type}"
                )));
            }
            true
        }
        QueryType::Attribute | QueryType::All => true,
    };

    if supported {
        Ok(())
    } else {
        Err(Error::UnrecognizedQueryType(format!(
            "{query_type} queries are not supported for {entity_type}"
        )))
    }
}

fn required(field: &Option<String>, name: &str, query_type: QueryType) -> Result<String> {
    match field.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(Error::InvalidQuery(format!("{query_type} query needs a non-empty {name}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plan(options: QueryOptions) -> Result<SearchPlan> {
        build(&options, &QueryConfig::default())
    }

    #[test]
    fn test_property_equality() {
        let result = plan(QueryOptions::property(EntityType::Experiment, "SEEK_STUDY_ID", "Study_1"));
        assert_eq!(
            result.unwrap(),
            SearchPlan::Search(vec![SearchCriteria::PropertyEquals {
                property: "SEEK_STUDY_ID".into(),
                value: "Study_1".into(),
            }])
        );
    }

    #[test]
    fn test_empty_and_any_property_short_circuit() {
        for name in ["", "   ", "any", "any_property", "ANY_PROPERTY"] {
            let result = plan(QueryOptions::property(EntityType::Experiment, name, "Study_1"));
            assert_eq!(result.unwrap(), SearchPlan::ShortCircuit, "property {name:?}");
        }
    }

    #[test]
    fn test_short_circuit_ignores_missing_value() {
        let options = QueryOptions::new(
            EntityType::Sample,
            QueryMode::Property { property: String::new(), value: None },
        );
        assert_eq!(plan(options).unwrap(), SearchPlan::ShortCircuit);
    }

    #[test]
    fn test_property_without_value_is_invalid() {
        let options = QueryOptions::new(
            EntityType::Sample,
            QueryMode::Property { property: "NAME".into(), value: None },
        );
        assert!(matches!(plan(options), Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn test_property_on_space_is_unrecognized() {
        let result = plan(QueryOptions::property(EntityType::Space, "", "x"));
        assert!(matches!(result, Err(Error::UnrecognizedQueryType(_))));
    }

    #[test]
    fn test_empty_attribute_matches_all() {
        for value in ["", "  ", " , "] {
            let result = plan(QueryOptions::perm_ids(EntityType::Space, value));
            assert_eq!(result.unwrap(), SearchPlan::Search(vec![SearchCriteria::All]));
        }
    }

    #[test]
    fn test_multi_value_attribute_keeps_order_and_duplicates() {
        let result = plan(QueryOptions::perm_ids(
            EntityType::Experiment,
            "20151216143716562-2, 20151216112932823-1,,20151216143716562-2",
        ));
        assert_eq!(
            result.unwrap(),
            SearchPlan::Search(vec![SearchCriteria::PermIds {
                perm_ids: vec![
                    "20151216143716562-2".into(),
                    "20151216112932823-1".into(),
                    "20151216143716562-2".into(),
                ],
            }])
        );
    }

    #[test]
    fn test_identifier_chunks() {
        let config = QueryConfig { max_ids_per_search: 2, ..Default::default() };
        let result = build(&QueryOptions::codes(EntityType::Sample, "a,b,c"), &config).unwrap();
        assert_eq!(
            result,
            SearchPlan::Search(vec![
                SearchCriteria::Codes { codes: vec!["a".into(), "b".into()] },
                SearchCriteria::Codes { codes: vec!["c".into()] },
            ])
        );
    }

    #[test]
    fn test_semantic_requires_both_ids() {
        let options = QueryOptions::new(
            EntityType::SampleType,
            QueryMode::Semantic {
                predicate_accession_id: Some("is_a".into()),
                descriptor_accession_id: None,
            },
        );
        assert!(matches!(plan(options), Err(Error::InvalidQuery(_))));

        let result = plan(QueryOptions::semantic(EntityType::DataSetType, "is_a", "assay"));
        assert_eq!(
            result.unwrap(),
            SearchPlan::Search(vec![SearchCriteria::SemanticAnnotation {
                predicate_accession_id: "is_a".into(),
                descriptor_accession_id: "assay".into(),
            }])
        );
    }

    #[test]
    fn test_semantic_on_instance_level_is_invalid() {
        let result = plan(QueryOptions::semantic(EntityType::Sample, "is_a", "assay"));
        assert!(matches!(result, Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn test_type_requires_code() {
        let options = QueryOptions::new(EntityType::Sample, QueryMode::Type { type_code: None });
        assert!(matches!(plan(options), Err(Error::InvalidQuery(_))));

        let result = plan(QueryOptions::of_type(EntityType::Sample, "TZ_FAIR_ASSAY"));
        assert_eq!(
            result.unwrap(),
            SearchPlan::Search(vec![SearchCriteria::TypeCode { type_code: "TZ_FAIR_ASSAY".into() }])
        );
    }

    #[test]
    fn test_type_on_space_is_unrecognized() {
        let result = plan(QueryOptions::of_type(EntityType::Space, "X"));
        assert!(matches!(result, Err(Error::UnrecognizedQueryType(_))));
    }

    #[test]
    fn test_all() {
        for entity_type in EntityType::ALL {
            assert_eq!(
                plan(QueryOptions::all(entity_type)).unwrap(),
                SearchPlan::Search(vec![SearchCriteria::All])
            );
        }
    }
}
