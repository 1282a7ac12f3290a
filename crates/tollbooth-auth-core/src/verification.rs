//! Email-verification token flow
//!
//! A restricted variant of the codec: subject-only claims, short TTL,
//! dedicated purpose. Single use is approximated by the side effect
//! being idempotent rather than by consuming the token; re-presenting a
//! token within its lifetime is a safe no-op.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tollbooth_store::{StoreResult, UserDirectory};
use tollbooth_types::UserId;

use crate::codec::{ClaimSet, TokenCodec, TokenPurpose};
use crate::config::AuthConfig;
use crate::AuthError;

/// Issues and consumes email-verification tokens
pub struct VerificationFlow<D> {
    codec: TokenCodec,
    directory: Arc<D>,
    ttl: Duration,
    dependency_timeout: Duration,
}

impl<D: UserDirectory> VerificationFlow<D> {
    /// Create a new verification flow
    pub fn new(config: &AuthConfig, directory: Arc<D>) -> Self {
        Self {
            codec: TokenCodec::from_config(config),
            directory,
            ttl: config.verification_ttl,
            dependency_timeout: config.dependency_timeout,
        }
    }

    /// Mint a verification token for the given user
    pub fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        self.codec.mint(
            &ClaimSet::Verification {
                subject: user_id.to_string(),
            },
            self.ttl,
        )
    }

    /// Consume a verification token, flipping the account's verified flag
    ///
    /// Verifying an already-verified account is not an error; the call
    /// succeeds without a second mutation.
    pub async fn consume(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.codec.verify(token, TokenPurpose::Verification)?;
        let user_id = UserId::parse(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .bounded(self.directory.find_by_id(user_id))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.is_verified {
            tracing::debug!(user_id = %user_id, "account already verified");
            return Ok(user_id);
        }

        self.bounded(self.directory.set_verified(user_id, true))
            .await?;

        tracing::debug!(user_id = %user_id, "account verified");
        Ok(user_id)
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = StoreResult<T>>,
    ) -> Result<T, AuthError> {
        match tokio::time::timeout(self.dependency_timeout, fut).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => {
                tracing::error!(
                    "collaborator call timed out after {:?}",
                    self.dependency_timeout
                );
                Err(AuthError::Unavailable(
                    "collaborator call timed out".to_string(),
                ))
            }
        }
    }
}

impl<D> std::fmt::Debug for VerificationFlow<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationFlow")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
