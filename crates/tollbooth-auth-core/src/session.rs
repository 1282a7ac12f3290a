//! Session authority
//!
//! Orchestrates login, refresh, and logout over the token codec and the
//! revocation store, enforcing the credential validity state machine:
//! refresh tokens rotate on every use, forming a forward-only chain, and
//! a revoked token stays dead for its natural lifetime.

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tollbooth_store::{NewUser, RevocationStore, StoreResult, UserDirectory, UserRecord};
use tollbooth_types::{Role, UserId};

use crate::codec::{ClaimSet, TokenCodec, TokenPurpose};
use crate::config::AuthConfig;
use crate::crypto;
use crate::hasher::PasswordHasher;
use crate::AuthError;

/// Access and refresh token minted together for one subject
///
/// Delivery (response body fields, cookies) is the transport's concern;
/// the authority only ever hands back the plain values.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Session authority
///
/// Stateless per request: the only shared state is the signing key
/// (immutable after construction) and the injected store clients.
pub struct SessionAuthority<D, R, H> {
    codec: TokenCodec,
    directory: Arc<D>,
    revocations: Arc<R>,
    hasher: Arc<H>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    dependency_timeout: Duration,
}

impl<D, R, H> SessionAuthority<D, R, H>
where
    D: UserDirectory,
    R: RevocationStore,
    H: PasswordHasher,
{
    /// Create a new session authority
    pub fn new(
        config: &AuthConfig,
        directory: Arc<D>,
        revocations: Arc<R>,
        hasher: Arc<H>,
    ) -> Self {
        Self {
            codec: TokenCodec::from_config(config),
            directory,
            revocations,
            hasher,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            dependency_timeout: config.dependency_timeout,
        }
    }

    /// Register a new account
    ///
    /// The new record starts unverified; the caller pairs this with
    /// [`VerificationFlow::issue`] and its own email delivery.
    ///
    /// [`VerificationFlow::issue`]: crate::verification::VerificationFlow::issue
    pub async fn register(&self, email: &str, password: &str) -> Result<UserRecord, AuthError> {
        let existing = self.bounded(self.directory.find_by_email(email)).await?;
        if existing.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .bounded(self.directory.create(NewUser {
                id: UserId::new(),
                email: email.to_string(),
                password_hash,
                role: Role::User,
            }))
            .await?;

        tracing::debug!(user_id = %user.id, "registered new account");
        Ok(user)
    }

    /// Authenticate credentials and mint a session pair
    ///
    /// Unknown email and wrong password produce the identical
    /// [`AuthError::InvalidCredentials`] signal.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionPair, AuthError> {
        let user = self.bounded(self.directory.find_by_email(email)).await?;

        let Some(user) = user else {
            return Err(AuthError::InvalidCredentials);
        };
        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }
        if !user.is_verified {
            return Err(AuthError::AccountUnverified);
        }

        tracing::debug!(user_id = %user.id, "login succeeded");
        self.mint_pair(&user)
    }

    /// Rotate a refresh token into a brand-new session pair
    ///
    /// The presented token must exist, verify under the codec, and not
    /// appear in the revocation store. The account's active flag is
    /// re-checked at the moment of use. The new pair is minted before
    /// the presented token is revoked, so a mint failure never destroys
    /// the caller's only valid credential.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<SessionPair, AuthError> {
        let token = refresh_token.ok_or(AuthError::MissingToken)?;
        let key = crypto::hash_token(token);

        if self.bounded(self.revocations.is_revoked(&key)).await? {
            tracing::debug!("refresh rejected: token revoked");
            return Err(AuthError::TokenRevoked);
        }

        let claims = self.codec.verify(token, TokenPurpose::Refresh)?;

        // A subject that no longer resolves is indistinguishable from a
        // forged token on this path.
        let user_id = UserId::parse(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let user = self
            .bounded(self.directory.find_by_id(user_id))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !user.is_active {
            tracing::debug!(user_id = %user.id, "refresh rejected: account disabled");
            return Err(AuthError::AccountDisabled);
        }

        let pair = self.mint_pair(&user)?;

        // Rotation: retire the presented token for the rest of its own
        // lifetime, acknowledged before the new pair is released.
        self.bounded(self.revocations.revoke(&key, claims.remaining_lifetime()))
            .await?;

        tracing::debug!(user_id = %user.id, "refresh token rotated");
        Ok(pair)
    }

    /// Revoke a refresh token
    ///
    /// Idempotent: logging out an already-revoked token overwrites its
    /// marker and succeeds.
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError> {
        let token = refresh_token.ok_or(AuthError::MissingToken)?;

        let claims = self.codec.verify(token, TokenPurpose::Refresh)?;
        let key = crypto::hash_token(token);

        self.bounded(self.revocations.revoke(&key, claims.remaining_lifetime()))
            .await?;

        tracing::debug!(subject = %claims.sub, "refresh token revoked");
        Ok(())
    }

    fn mint_pair(&self, user: &UserRecord) -> Result<SessionPair, AuthError> {
        let subject = user.id.to_string();

        let access_token = self.codec.mint(
            &ClaimSet::Access {
                subject: subject.clone(),
                role: user.role,
            },
            self.access_ttl,
        )?;
        let refresh_token = self
            .codec
            .mint(&ClaimSet::Refresh { subject }, self.refresh_ttl)?;

        Ok(SessionPair {
            access_token,
            refresh_token,
        })
    }

    /// Bound a collaborator call by the configured timeout
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

impl<D, R, H> std::fmt::Debug for SessionAuthority<D, R, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthority")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
