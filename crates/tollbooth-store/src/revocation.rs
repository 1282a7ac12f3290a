//! Revocation store interface

use async_trait::async_trait;
use std::time::Duration;

use crate::error::StoreResult;

/// Expiring key-value store tracking revoked refresh tokens
///
/// Keys are opaque to the store; the authority passes a hash of the
/// token, never the token itself. The TTL handed to [`revoke`] is the
/// remaining lifetime of the token at revocation time, so a marker
/// never outlives the token it marks and the store never grows
/// unbounded.
///
/// A `revoke` must be acknowledged by the backend before it returns;
/// a concurrent read that raced in just before the write observing the
/// old state is acceptable, a lost write is not.
///
/// [`revoke`]: RevocationStore::revoke
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Insert or overwrite a revocation marker with the given TTL
    async fn revoke(&self, key: &str, ttl: Duration) -> StoreResult<()>;

    /// Check whether a revocation marker exists for the key
    async fn is_revoked(&self, key: &str) -> StoreResult<bool>;
}
