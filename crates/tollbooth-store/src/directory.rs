//! User directory interface
//!
//! The minimal user record the token authority needs to authorize a
//! token, and the async interface for looking it up. Persistence lives
//! behind this trait; the authority never sees a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tollbooth_types::{Role, UserId};

use crate::error::StoreResult;

/// User record as seen by the token authority
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create user input
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// User directory trait
///
/// Implementations must bound their own I/O; the authority additionally
/// wraps every call in a configured timeout.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Persist a new user
    async fn create(&self, user: NewUser) -> StoreResult<UserRecord>;

    /// Update the email-verified flag
    async fn set_verified(&self, id: UserId, verified: bool) -> StoreResult<()>;
}
