//! # openbis-query — Query Façade over an openBIS Application Server
//!
//! Translates declarative query options into Application Server searches
//! and assembles the nested, key-grouped result structure consumers read.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `SearchTransport` is the contract between the engine and the server
//! 2. **Typed options**: one `QueryMode` variant per query type, no option-bag lookups
//! 3. **Criteria building is a pure function**: `QueryOptions` → `SearchPlan`
//! 4. **No state between calls**: a query depends only on its options and the session token
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openbis_query::{ApplicationServerQuery, Credentials, EntityType, MemoryTransport, QueryOptions};
//!
//! # async fn example() -> openbis_query::Result<()> {
//! let transport = MemoryTransport::new().with_user(Credentials::new("apiuser", "apiuser"));
//! let query = ApplicationServerQuery::login(
//!     transport.clone(),
//!     &transport,
//!     &Credentials::new("apiuser", "apiuser"),
//! )
//! .await?;
//!
//! let result = query.query(&QueryOptions::perm_ids(EntityType::Space, "")).await?;
//! for space in result.entities(EntityType::Space) {
//!     println!("{} {:?}", space.perm_id, space.code);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Query stages
//!
//! ```text
//! Validating → BuildingCriteria → Fetching → Normalizing → Done
//!      └──── empty / "any" property ────────────────────────┘
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod criteria;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod transport;

use std::fmt;

use tracing::Instrument;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Attribute, EntityType, NormalizedEntity, NormalizedResult, PropertyMap, QueryMode,
    QueryOptions, QueryType, RawEntity, RawQueryOptions, SemanticAnnotation,
};

// ============================================================================
// Re-exports: Criteria, Fetch, Transport, Config
// ============================================================================

pub use config::QueryConfig;
pub use criteria::{SearchCriteria, SearchPlan};
pub use fetch::FetchOptions;
pub use transport::{Credentials, MemoryTransport, SearchTransport, SessionProvider, SessionToken};

// ============================================================================
// Query stages
// ============================================================================

/// Stage of a single query call, as reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Validating,
    BuildingCriteria,
    Fetching,
    Normalizing,
    Done,
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryStage::Validating => "validating",
            QueryStage::BuildingCriteria => "building_criteria",
            QueryStage::Fetching => "fetching",
            QueryStage::Normalizing => "normalizing",
            QueryStage::Done => "done",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Top-level query handle
// ============================================================================

/// The primary entry point. Wraps a transport and a session token and
/// answers queries against the Application Server.
///
/// Holds no mutable state, so one handle can serve concurrent queries as
/// long as the transport can.
pub struct ApplicationServerQuery<T: SearchTransport> {
    transport: T,
    token: SessionToken,
    config: QueryConfig,
}

impl<T: SearchTransport> ApplicationServerQuery<T> {
    /// Create a query handle for an already authenticated session.
    pub fn new(transport: T, token: SessionToken) -> Self {
        Self {
            transport,
            token,
            config: QueryConfig::default(),
        }
    }

    /// Create a query handle with custom configuration.
    pub fn with_config(transport: T, token: SessionToken, config: QueryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { transport, token, config })
    }

    /// Log in through `sessions` and wrap the resulting token.
    pub async fn login<P: SessionProvider + ?Sized>(
        transport: T,
        sessions: &P,
        credentials: &Credentials,
    ) -> Result<Self> {
        let token = sessions.login(credentials).await?;
        tracing::debug!(username = %credentials.username, "logged in");
        Ok(Self::new(transport, token))
    }

    /// Run a query.
    ///
    /// Returns an empty result when nothing matches, and also, without any
    /// remote call, when a PROPERTY query names no property or the "any"
    /// placeholder.
    pub async fn query(&self, options: &QueryOptions) -> Result<NormalizedResult> {
        let span = tracing::info_span!(
            "query",
            entity_type = %options.entity_type,
            query_type = %options.query_type(),
        );
        self.run(options).instrument(span).await
    }

    /// Run a query from a loosely typed option bag.
    pub async fn query_raw(&self, options: RawQueryOptions) -> Result<NormalizedResult> {
        tracing::debug!(stage = %QueryStage::Validating, "parsing option bag");
        let options = QueryOptions::try_from(options)?;
        self.query(&options).await
    }

    /// Run a query from a JSON option bag such as
    /// `{"entityType": "DataSet", "queryType": "ALL"}`.
    pub async fn query_json(&self, options: &serde_json::Value) -> Result<NormalizedResult> {
        let raw: RawQueryOptions = serde_json::from_value(options.clone())?;
        self.query_raw(raw).await
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    async fn run(&self, options: &QueryOptions) -> Result<NormalizedResult> {
        tracing::debug!(stage = %QueryStage::Validating);
        // build() also rejects unsupported type combinations and missing fields.
        tracing::debug!(stage = %QueryStage::BuildingCriteria);
        let plan = criteria::build(options, &self.config).inspect_err(|e| {
            tracing::debug!(error = %e, "query rejected before any remote call");
        })?;

        let criteria = match plan {
            SearchPlan::ShortCircuit => {
                tracing::debug!(stage = %QueryStage::Done, "property unspecified, skipping search");
                return Ok(NormalizedResult::new());
            }
            SearchPlan::Search(criteria) => criteria,
        };

        tracing::debug!(stage = %QueryStage::Fetching, searches = criteria.len());
        let records =
            fetch::fetch_all(&self.transport, options.entity_type, &criteria, &self.token).await?;

        tracing::debug!(stage = %QueryStage::Normalizing, rows = records.len());
        let result = normalize::normalize(options.entity_type, records)?;

        tracing::debug!(stage = %QueryStage::Done, matched = result.entities(options.entity_type).len());
        Ok(result)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unrecognized query type: {0}")]
    UnrecognizedQueryType(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Dataset {perm_id} belongs to neither a sample nor an experiment")]
    MissingParent { perm_id: String },

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
