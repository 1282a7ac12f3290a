//! In-memory backends
//!
//! Process-local implementations of the store interfaces, used by the
//! test suites and for local development without Redis or a database.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tollbooth_types::UserId;

use crate::directory::{NewUser, UserDirectory, UserRecord};
use crate::error::StoreResult;
use crate::revocation::RevocationStore;

/// In-memory revocation store with lazy expiry
///
/// Entries map a key to its deadline; expired entries are dropped on
/// the next read of that key.
#[derive(Default, Clone)]
pub struct MemoryRevocationStore {
    entries: Arc<DashMap<String, Instant>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining lifetime of a live marker, if any
    ///
    /// Exposed so tests can assert the TTL the authority recorded.
    pub fn remaining(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(key)
            .and_then(|deadline| deadline.checked_duration_since(Instant::now()))
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn revoke(&self, key: &str, ttl: Duration) -> StoreResult<()> {
        self.entries.insert(key.to_string(), Instant::now() + ttl);
        Ok(())
    }

    async fn is_revoked(&self, key: &str) -> StoreResult<bool> {
        if let Some(deadline) = self.entries.get(key).map(|d| *d.value()) {
            if deadline > Instant::now() {
                return Ok(true);
            }
            self.entries.remove(key);
        }
        Ok(false)
    }
}

impl std::fmt::Debug for MemoryRevocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRevocationStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// In-memory user directory
#[derive(Default, Clone)]
pub struct MemoryDirectory {
    users: Arc<DashMap<UserId, UserRecord>>,
    by_email: Arc<DashMap<String, UserId>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user record directly, bypassing `create`
    pub fn insert_user(&self, user: UserRecord) {
        self.by_email.insert(user.email.clone(), user.id);
        self.users.insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, user: NewUser) -> StoreResult<UserRecord> {
        let record = UserRecord {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: true,
            is_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.insert_user(record.clone());
        Ok(record)
    }

    async fn set_verified(&self, id: UserId, verified: bool) -> StoreResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.is_verified = verified;
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}
