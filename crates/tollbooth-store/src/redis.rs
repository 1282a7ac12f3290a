//! Redis-backed revocation store
//!
//! Stores revocation markers as `revocation:<key>` entries with a
//! Redis-managed TTL, so expired markers vanish without any sweeper.

use async_trait::async_trait;
use std::time::Duration;

use ::redis::{aio::ConnectionManager, AsyncCommands, Client};

use crate::error::{StoreError, StoreResult};
use crate::revocation::RevocationStore;

/// Key namespace for revocation markers
const KEY_PREFIX: &str = "revocation:";

/// Marker value; only key presence matters
const MARKER: &str = "1";

/// Default per-operation timeout
const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Revocation store backed by Redis
///
/// Every operation is bounded by an internal timeout so a stalled
/// backend surfaces as [`StoreError::Timeout`] instead of hanging the
/// request. Writes use `SET EX` and are acknowledged by Redis before
/// `revoke` returns.
#[derive(Clone)]
pub struct RedisRevocationStore {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisRevocationStore {
    /// Connect to Redis at the given URL
    ///
    /// The connection manager reconnects on its own after transient
    /// failures; individual commands still fail fast via the bounded
    /// timeout.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        Self::connect_with_timeout(url, DEFAULT_OP_TIMEOUT).await
    }

    /// Connect with a custom per-operation timeout
    pub async fn connect_with_timeout(url: &str, op_timeout: Duration) -> StoreResult<Self> {
        let client = Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;

        let conn = tokio::time::timeout(op_timeout, client.get_connection_manager())
            .await
            .map_err(|_| StoreError::Timeout)?
            .map_err(|e| {
                tracing::error!("failed to connect to redis: {}", e);
                StoreError::Connection(e.to_string())
            })?;

        Ok(Self { conn, op_timeout })
    }

    /// Health check
    pub async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        self.bounded(async move {
            ::redis::cmd("PING")
                .query_async::<()>(&mut conn)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))
        })
        .await
    }

    fn namespaced(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("redis operation timed out after {:?}", self.op_timeout);
                Err(StoreError::Timeout)
            }
        }
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, key: &str, ttl: Duration) -> StoreResult<()> {
        let key = Self::namespaced(key);
        // Redis rejects SETEX with a zero TTL; a marker must live at
        // least one second.
        let seconds = ttl.as_secs().max(1);

        let mut conn = self.conn.clone();
        self.bounded(async move {
            conn.set_ex::<_, _, ()>(&key, MARKER, seconds)
                .await
                .map_err(|e| {
                    tracing::error!("failed to write revocation marker: {}", e);
                    StoreError::Backend(e.to_string())
                })
        })
        .await
    }

    async fn is_revoked(&self, key: &str) -> StoreResult<bool> {
        let key = Self::namespaced(key);

        let mut conn = self.conn.clone();
        self.bounded(async move {
            conn.exists::<_, bool>(&key).await.map_err(|e| {
                tracing::error!("failed to check revocation marker: {}", e);
                StoreError::Backend(e.to_string())
            })
        })
        .await
    }
}

impl std::fmt::Debug for RedisRevocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRevocationStore")
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}
