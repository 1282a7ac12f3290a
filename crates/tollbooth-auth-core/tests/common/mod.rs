//! Shared fixtures for integration tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tollbooth_auth_core::{AuthConfig, BcryptHasher, PasswordHasher};
use tollbooth_store::{
    MemoryDirectory, NewUser, RevocationStore, StoreResult, UserDirectory, UserRecord,
};
use tollbooth_types::{Role, UserId};

/// Signing secret used across the integration suites (32+ bytes)
pub const TEST_SECRET: &str = "integration-test-signing-secret-0123456789";

/// Config with default lifetimes and the test secret
pub fn test_config() -> AuthConfig {
    AuthConfig::new(TEST_SECRET).expect("test secret is long enough")
}

/// Cheap hasher; bcrypt's minimum cost keeps the suites fast
pub fn test_hasher() -> Arc<BcryptHasher> {
    Arc::new(BcryptHasher::with_cost(4))
}

/// Seed an active, verified user ready to log in
#[allow(dead_code)]
pub async fn seed_user(
    directory: &MemoryDirectory,
    hasher: &BcryptHasher,
    email: &str,
    password: &str,
) -> UserRecord {
    let record = directory
        .create(NewUser {
            id: UserId::new(),
            email: email.to_string(),
            password_hash: hasher.hash(password).unwrap(),
            role: Role::User,
        })
        .await
        .unwrap();
    directory.set_verified(record.id, true).await.unwrap();
    directory.find_by_id(record.id).await.unwrap().unwrap()
}

/// Flip a user's active flag in place
#[allow(dead_code)]
pub async fn set_active(directory: &MemoryDirectory, id: UserId, active: bool) {
    let mut record = directory.find_by_id(id).await.unwrap().unwrap();
    record.is_active = active;
    directory.insert_user(record);
}

/// Directory wrapper that counts `set_verified` mutations
#[allow(dead_code)]
pub struct CountingDirectory {
    inner: MemoryDirectory,
    set_verified_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingDirectory {
    pub fn new(inner: MemoryDirectory) -> Self {
        Self {
            inner,
            set_verified_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_verified_calls(&self) -> usize {
        self.set_verified_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for CountingDirectory {
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        self.inner.find_by_email(email).await
    }

    async fn create(&self, user: NewUser) -> StoreResult<UserRecord> {
        self.inner.create(user).await
    }

    async fn set_verified(&self, id: UserId, verified: bool) -> StoreResult<()> {
        self.set_verified_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.set_verified(id, verified).await
    }
}

/// Revocation store that stalls long enough to trip any short timeout
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SlowRevocationStore {
    delay: Duration,
}

#[allow(dead_code)]
impl SlowRevocationStore {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RevocationStore for SlowRevocationStore {
    async fn revoke(&self, _key: &str, _ttl: Duration) -> StoreResult<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn is_revoked(&self, _key: &str) -> StoreResult<bool> {
        tokio::time::sleep(self.delay).await;
        Ok(false)
    }
}
