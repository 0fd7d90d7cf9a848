//! # Transport Contract
//!
//! The narrow interface between the query engine and the Application
//! Server. Authentication and the session-token-bearing remote calls live
//! behind these traits; the engine only ever sees a `SessionToken` and a
//! list of `RawEntity` records.
//!
//! ## Implementations
//!
//! | Transport | Module | Description |
//! |-----------|--------|-------------|
//! | `MemoryTransport` | `memory` | Fixture-backed, for testing/embedding |
//!
//! Network transports live in the host application. They must be safe to
//! share between concurrent queries and should bound the time of each
//! call; the engine does neither retries nor timeouts.

pub mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::criteria::SearchCriteria;
use crate::fetch::FetchOptions;
use crate::model::{EntityType, RawEntity};
use crate::Result;

pub use memory::MemoryTransport;

// ============================================================================
// Session
// ============================================================================

/// Opaque session token returned by a login.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Username / password pair for a login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Issues session tokens.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Log in, returning a token for subsequent searches.
    /// Fails with `Error::AuthError` on bad credentials.
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken>;
}

// ============================================================================
// SearchTransport Trait
// ============================================================================

/// Executes entity searches on the Application Server.
#[async_trait]
pub trait SearchTransport: Send + Sync + 'static {
    /// Search entities of one kind.
    ///
    /// Returns records in the server's order, populated with the related
    /// data `fetch_options` asks for and nothing else. An empty match is
    /// `Ok(vec![])`. Service and network faults are `Error::TransportError`.
    async fn search(
        &self,
        entity_type: EntityType,
        criteria: &SearchCriteria,
        fetch_options: &FetchOptions,
        token: &SessionToken,
    ) -> Result<Vec<RawEntity>>;
}

#[async_trait]
impl<T: SearchTransport + ?Sized> SearchTransport for Arc<T> {
    async fn search(
        &self,
        entity_type: EntityType,
        criteria: &SearchCriteria,
        fetch_options: &FetchOptions,
        token: &SessionToken,
    ) -> Result<Vec<RawEntity>> {
        (**self).search(entity_type, criteria, fetch_options, token).await
    }
}

#[async_trait]
impl<P: SessionProvider + ?Sized> SessionProvider for Arc<P> {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken> {
        (**self).login(credentials).await
    }
}
