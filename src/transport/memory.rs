//! In-memory transport.
//!
//! This is the reference implementation of `SearchTransport` and
//! `SessionProvider`. It holds fixture records per entity kind, evaluates
//! every `SearchCriteria` variant itself, and strips whatever the fetch
//! options did not ask for, the way the real Application Server does.
//!
//! ## Limitations
//!
//! - **One user**: `login()` accepts a single configured credential pair.
//! - **Tokens are not checked for expiry**: any token it issued stays valid.
//! - **Sessions are never dropped**: every `login()` adds a token that is kept
//!   for the transport's lifetime.
//! - **Full scans**: every search walks all records of the kind.
//!
//! Use this transport for:
//! - Testing criteria building, fetch options and normalization
//! - Counting remote calls (`search_calls()`) to verify short-circuits
//! - Embedding the engine over a static data set

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{Credentials, SearchTransport, SessionProvider, SessionToken};
use crate::criteria::SearchCriteria;
use crate::fetch::FetchOptions;
use crate::model::{EntityType, RawEntity};
use crate::{Error, Result};

// ============================================================================
// MemoryTransport
// ============================================================================

/// Fixture-backed Application Server stand-in.
pub struct MemoryTransport {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    /// entity kind → records in server order
    entities: RwLock<HashMap<EntityType, Vec<RawEntity>>>,
    credentials: RwLock<Option<Credentials>>,
    /// tokens handed out by `login()`
    sessions: RwLock<Vec<SessionToken>>,
    search_calls: AtomicU64,
    next_session: AtomicU64,
    fail_next_search: AtomicBool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                entities: RwLock::new(HashMap::new()),
                credentials: RwLock::new(None),
                sessions: RwLock::new(Vec::new()),
                search_calls: AtomicU64::new(0),
                next_session: AtomicU64::new(1),
                fail_next_search: AtomicBool::new(false),
            }),
        }
    }

    /// Accept logins for exactly this user.
    pub fn with_user(self, credentials: Credentials) -> Self {
        *self.inner.credentials.write() = Some(credentials);
        self
    }

    /// Append a record for `entity_type`. Records are returned in insertion order.
    pub fn insert(&self, entity_type: EntityType, entity: RawEntity) {
        self.inner
            .entities
            .write()
            .entry(entity_type)
            .or_default()
            .push(entity);
    }

    pub fn insert_all(&self, entity_type: EntityType, entities: impl IntoIterator<Item = RawEntity>) {
        self.inner
            .entities
            .write()
            .entry(entity_type)
            .or_default()
            .extend(entities);
    }

    /// Number of records stored for a kind.
    pub fn count(&self, entity_type: EntityType) -> usize {
        self.inner
            .entities
            .read()
            .get(&entity_type)
            .map_or(0, Vec::len)
    }

    /// Number of `search()` calls made so far, failed ones included.
    pub fn search_calls(&self) -> u64 {
        self.inner.search_calls.load(Ordering::SeqCst)
    }

    /// Make the next `search()` fail with a transport error.
    pub fn fail_next_search(&self) {
        self.inner.fail_next_search.store(true, Ordering::SeqCst);
    }

    fn check_session(&self, token: &SessionToken) -> Result<()> {
        // With no configured user, every token is accepted.
        if self.inner.credentials.read().is_none() {
            return Ok(());
        }
        if self.inner.sessions.read().contains(token) {
            Ok(())
        } else {
            Err(Error::TransportError("invalid session token".into()))
        }
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryTransport {
    /// Clones share the same records and counters.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// ============================================================================
// Criteria evaluation
// ============================================================================

fn criteria_matches(criteria: &SearchCriteria, entity: &RawEntity) -> bool {
    match criteria {
        SearchCriteria::PropertyEquals { property, value } => {
            entity.property(property) == Some(value.as_str())
        }
        SearchCriteria::PermIds { perm_ids } => perm_ids.iter().any(|id| *id == entity.perm_id),
        SearchCriteria::Codes { codes } => entity
            .code
            .as_ref()
            .is_some_and(|code| codes.contains(code)),
        SearchCriteria::SemanticAnnotation {
            predicate_accession_id,
            descriptor_accession_id,
        } => entity.semantic_annotations.iter().any(|a| {
            a.predicate_accession_id == *predicate_accession_id
                && a.descriptor_accession_id == *descriptor_accession_id
        }),
        SearchCriteria::TypeCode { type_code } => entity.type_code.as_deref() == Some(type_code.as_str()),
        SearchCriteria::All => true,
    }
}

// ============================================================================
// Trait impls
// ============================================================================

#[async_trait]
impl SearchTransport for MemoryTransport {
    async fn search(
        &self,
        entity_type: EntityType,
        criteria: &SearchCriteria,
        fetch_options: &FetchOptions,
        token: &SessionToken,
    ) -> Result<Vec<RawEntity>> {
        self.inner.search_calls.fetch_add(1, Ordering::SeqCst);

        if self.inner.fail_next_search.swap(false, Ordering::SeqCst) {
            return Err(Error::TransportError("service unavailable".into()));
        }
        self.check_session(token)?;

        let entities = self.inner.entities.read();
        let found: Vec<RawEntity> = entities
            .get(&entity_type)
            .map(|records| {
                records
                    .iter()
                    .filter(|e| criteria_matches(criteria, e))
                    .map(|e| fetch_options.restrict(e.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(found)
    }
}

#[async_trait]
impl SessionProvider for MemoryTransport {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken> {
        let expected = self.inner.credentials.read().clone();
        match expected {
            Some(expected) if expected == *credentials => {
                let n = self.inner.next_session.fetch_add(1, Ordering::Relaxed);
                let token = SessionToken::new(format!("{}-{n:06}", credentials.username));
                self.inner.sessions.write().push(token.clone());
                Ok(token)
            }
            Some(_) => Err(Error::AuthError(format!(
                "login failed for user '{}'",
                credentials.username
            ))),
            None => Err(Error::AuthError("no user configured".into())),
        }
    }
}
