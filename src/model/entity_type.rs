//! Entity kinds exposed by the Application Server and the query modes
//! that can be run against them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Kind of entity a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Experiment,
    Sample,
    DataSet,
    Space,
    Project,
    SampleType,
    DataSetType,
}

impl EntityType {
    pub const ALL: [EntityType; 7] = [
        EntityType::Experiment,
        EntityType::Sample,
        EntityType::DataSet,
        EntityType::Space,
        EntityType::Project,
        EntityType::SampleType,
        EntityType::DataSetType,
    ];

    /// Canonical name, as the Application Server spells it.
    pub fn name(&self) -> &'static str {
        match self {
            EntityType::Experiment => "Experiment",
            EntityType::Sample => "Sample",
            EntityType::DataSet => "DataSet",
            EntityType::Space => "Space",
            EntityType::Project => "Project",
            EntityType::SampleType => "SampleType",
            EntityType::DataSetType => "DataSetType",
        }
    }

    /// Key under which normalized entities of this kind are grouped.
    pub fn result_key(&self) -> &'static str {
        match self {
            EntityType::Experiment => "experiments",
            EntityType::Sample => "samples",
            EntityType::DataSet => "datasets",
            EntityType::Space => "spaces",
            EntityType::Project => "projects",
            EntityType::SampleType => "sampletypes",
            EntityType::DataSetType => "datasettypes",
        }
    }

    /// Entities carrying a property bag that PROPERTY queries can match.
    pub fn has_properties(&self) -> bool {
        matches!(self, EntityType::Experiment | EntityType::Sample | EntityType::DataSet)
    }

    /// Entities with a declared type code that TYPE queries can match.
    pub fn has_declared_type(&self) -> bool {
        matches!(self, EntityType::Experiment | EntityType::Sample | EntityType::DataSet)
    }

    /// Type-level entities, the only ones carrying semantic annotations.
    pub fn is_type_level(&self) -> bool {
        matches!(self, EntityType::SampleType | EntityType::DataSetType)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EntityType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnrecognizedQueryType(format!("unknown entity type '{s}'")))
    }
}

/// Query mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    Property,
    Attribute,
    Semantic,
    Type,
    All,
}

impl QueryType {
    pub fn name(&self) -> &'static str {
        match self {
            QueryType::Property => "PROPERTY",
            QueryType::Attribute => "ATTRIBUTE",
            QueryType::Semantic => "SEMANTIC",
            QueryType::Type => "TYPE",
            QueryType::All => "ALL",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        [
            QueryType::Property,
            QueryType::Attribute,
            QueryType::Semantic,
            QueryType::Type,
            QueryType::All,
        ]
        .into_iter()
        .find(|q| q.name().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| Error::UnrecognizedQueryType(format!("unknown query type '{s}'")))
    }
}
