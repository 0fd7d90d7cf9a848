//! Shared Application Server fixture for the end-to-end tests.
//!
//! Two spaces, two projects, two experiments, four samples, twelve
//! datasets, plus sample and dataset types carrying ontology annotations.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use openbis_query::{
    ApplicationServerQuery, Credentials, EntityType, MemoryTransport, RawEntity, SemanticAnnotation,
};

pub const USER: &str = "apiuser";
pub const PASSWORD: &str = "apiuser";

pub const API_EXPERIMENT: &str = "20151216143716562-2";
pub const DEFAULT_EXPERIMENT: &str = "20151216112932823-1";
pub const API_PROJECT: &str = "20151216135152196-1";
pub const DEFAULT_PROJECT: &str = "20151216112932823-0";

pub const ASSAY_SAMPLE: &str = "20171002172111346-37";

/// Experiment-owned dataset.
pub const TOMEK_DATASET: &str = "20170907185702684-36";
/// Sample-owned dataset (the sample also sits in an experiment).
pub const SAMPLE_DATASET: &str = "20171002172401546-38";

pub const DATASET_IDS: [&str; 12] = [
    "20160210130359377-22",
    "20160210130454955-23",
    "20160215111736723-31",
    "20160215111920183-32",
    "20160215112234452-33",
    "20160215112457012-34",
    "20170907185702684-36",
    "20171002172401546-38",
    "20171002172651891-39",
    "20171003101237452-40",
    "20171003101505883-41",
    "20171003102211620-42",
];

pub const SAMPLE_TYPE_CODES: [&str; 6] = [
    "UNKNOWN",
    "TZ_FAIR_ASSAY",
    "TZ_FAIR_SAMPLE",
    "TZ_FAIR_STUDY",
    "EXPERIMENTAL_STEP",
    "TZ_ASSAY_PROTOCOL",
];

pub const DATASET_TYPE_CODES: [&str; 5] = [
    "UNKNOWN",
    "RAW_DATA",
    "ANALYZED_DATA",
    "TZ_FAIR_TEST",
    "TZ_FAIR_ASSAY_DATA",
];

pub fn credentials() -> Credentials {
    Credentials::new(USER, PASSWORD)
}

/// A transport loaded with the full fixture.
pub fn transport() -> MemoryTransport {
    let transport = MemoryTransport::new().with_user(credentials());
    let registered = Utc.with_ymd_and_hms(2015, 12, 16, 14, 37, 16).unwrap();

    transport.insert_all(
        EntityType::Space,
        [
            RawEntity::new("API-SPACE")
                .with_code("API-SPACE")
                .with_description("use for testing openbis api integration ")
                .with_registrator("admin")
                .with_registration_date(registered)
                .with_contents([API_EXPERIMENT], [API_PROJECT], DATASET_IDS),
            RawEntity::new("DEFAULT")
                .with_code("DEFAULT")
                .with_registrator("system")
                .with_contents([DEFAULT_EXPERIMENT], [DEFAULT_PROJECT], Vec::<String>::new()),
        ],
    );

    transport.insert_all(
        EntityType::Project,
        [
            RawEntity::new(API_PROJECT)
                .with_code("API-PROJECT")
                .with_description("project for api tests")
                .with_registrator("apiuser"),
            RawEntity::new(DEFAULT_PROJECT)
                .with_code("DEFAULT")
                .with_registrator("system"),
        ],
    );

    transport.insert_all(
        EntityType::Experiment,
        [
            RawEntity::new(DEFAULT_EXPERIMENT)
                .with_code("DEFAULT")
                .with_type_code("UNKNOWN")
                .with_registrator("system"),
            RawEntity::new(API_EXPERIMENT)
                .with_code("API-EXPERIMENT")
                .with_type_code("DEFAULT_EXPERIMENT")
                .with_registrator("apiuser")
                .with_registration_date(registered)
                .with_property("SEEK_STUDY_ID", "Study_1")
                .with_property("NAME", "Api experiment"),
        ],
    );

    transport.insert_all(
        EntityType::Sample,
        [
            RawEntity::new(ASSAY_SAMPLE)
                .with_code("TZ3")
                .with_type_code("TZ_FAIR_ASSAY")
                .with_registrator("apiuser")
                .with_property("NAME", "Tomek First")
                .with_experiment(API_EXPERIMENT),
            RawEntity::new("20171002190934144-40")
                .with_code("TZ4")
                .with_type_code("TZ_FAIR_ASSAY")
                .with_registrator("apiuser")
                .with_property("NAME", "Tomek Second")
                .with_experiment(API_EXPERIMENT)
                .with_parent(ASSAY_SAMPLE),
            RawEntity::new("20171121152132641-51")
                .with_code("SAMPLE-1")
                .with_type_code("TZ_FAIR_SAMPLE")
                .with_registrator("seek"),
            RawEntity::new("20171121153715264-58")
                .with_code("STUDY-1")
                .with_type_code("TZ_FAIR_STUDY")
                .with_registrator("seek")
                .with_property("SEEK_STUDY_ID", "Study_1"),
        ],
    );

    transport.insert_all(
        EntityType::DataSet,
        DATASET_IDS.iter().enumerate().map(|(i, id)| dataset(i, id)),
    );

    transport.insert_all(
        EntityType::SampleType,
        SAMPLE_TYPE_CODES.iter().map(|code| {
            let entity = RawEntity::new(*code).with_code(*code).with_description(format!("{code} type"));
            match *code {
                "TZ_FAIR_ASSAY" | "EXPERIMENTAL_STEP" => {
                    entity.with_annotation(SemanticAnnotation::new("is_a", "assay"))
                }
                "TZ_FAIR_STUDY" => entity.with_annotation(SemanticAnnotation::new("is_a", "study")),
                _ => entity,
            }
        }),
    );

    transport.insert_all(
        EntityType::DataSetType,
        DATASET_TYPE_CODES.iter().map(|code| {
            let entity = RawEntity::new(*code).with_code(*code);
            if *code == "TZ_FAIR_ASSAY_DATA" {
                entity.with_annotation(SemanticAnnotation::new("is_a", "assay"))
            } else {
                entity
            }
        }),
    );

    transport
}

fn dataset(index: usize, perm_id: &str) -> RawEntity {
    let base = RawEntity::new(perm_id)
        .with_code(perm_id)
        .with_registrator("apiuser")
        .with_data_store("DSS1");

    match perm_id {
        TOMEK_DATASET => base
            .with_type_code("TZ_FAIR_TEST")
            .with_property("NAME", "TOMEK test set")
            .with_experiment(API_EXPERIMENT),
        SAMPLE_DATASET => base
            .with_type_code("TZ_FAIR_TEST")
            .with_property("NAME", "DS One")
            .with_sample(ASSAY_SAMPLE)
            .with_experiment(API_EXPERIMENT),
        _ if index >= 10 => base
            .with_type_code("TZ_FAIR_TEST")
            .with_property("NAME", format!("DS {index}"))
            .with_sample("20171002190934144-40")
            .with_experiment(API_EXPERIMENT),
        _ => base
            .with_type_code("RAW_DATA")
            .with_experiment(API_EXPERIMENT),
    }
}

/// Number of TZ_FAIR_TEST datasets in the fixture.
pub const TZ_FAIR_TEST_DATASETS: usize = 4;

/// A logged-in query handle over the fixture.
pub async fn query() -> ApplicationServerQuery<MemoryTransport> {
    let transport = transport();
    ApplicationServerQuery::login(transport.clone(), &transport, &credentials())
        .await
        .unwrap()
}
