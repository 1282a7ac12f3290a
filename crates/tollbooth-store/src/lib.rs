//! Tollbooth Store - Collaborator interfaces and backends
//!
//! Defines the async interfaces the token authority depends on (user
//! directory, revocation store) together with their backends: a
//! Redis-backed revocation store for deployment and in-memory
//! implementations for tests and local development.
//!
//! # Example
//!
//! ```rust,ignore
//! use tollbooth_store::{RedisRevocationStore, RevocationStore};
//!
//! let store = RedisRevocationStore::connect("redis://localhost:6379").await?;
//! store.revoke("revocation-key", Duration::from_secs(3600)).await?;
//! assert!(store.is_revoked("revocation-key").await?);
//! ```

pub mod directory;
pub mod error;
pub mod memory;
pub mod redis;
pub mod revocation;

pub use directory::{NewUser, UserDirectory, UserRecord};
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryDirectory, MemoryRevocationStore};
pub use self::redis::RedisRevocationStore;
pub use revocation::RevocationStore;
