//! # Query Model
//!
//! DTOs shared by every stage: the typed query input, the raw records a
//! transport returns, and the normalized output handed back to callers.
//!
//! This module is pure data — no I/O, no state, no async.

pub mod entity;
pub mod entity_type;
pub mod options;
pub mod result;

pub use entity::{PropertyMap, RawEntity, SemanticAnnotation};
pub use entity_type::{EntityType, QueryType};
pub use options::{Attribute, QueryMode, QueryOptions, RawQueryOptions};
pub use result::{NormalizedEntity, NormalizedResult};
