//! Token codec
//!
//! Encodes and decodes signed, expiring claim sets. Pure computation
//! over the injected signing key; holds no state and touches no store.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tollbooth_types::Role;
use uuid::Uuid;

use crate::{AuthConfig, AuthError};

/// Purpose discriminator carried inside every token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    /// Short-lived credential for ordinary requests
    Access,
    /// Long-lived credential used solely to mint a new pair
    Refresh,
    /// One-shot email-verification credential
    Verification,
}

/// Typed claim set, one variant per token purpose
///
/// Keeping the payload a sum type means a missing field is a compile
/// error, not a runtime surprise during verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimSet {
    /// Access token: subject plus authorization role
    Access { subject: String, role: Role },
    /// Refresh token: subject only
    Refresh { subject: String },
    /// Verification token: subject only
    Verification { subject: String },
}

impl ClaimSet {
    /// The subject (user identifier) of the claim set
    pub fn subject(&self) -> &str {
        match self {
            Self::Access { subject, .. }
            | Self::Refresh { subject }
            | Self::Verification { subject } => subject,
        }
    }

    /// The purpose this claim set is minted for
    pub fn purpose(&self) -> TokenPurpose {
        match self {
            Self::Access { .. } => TokenPurpose::Access,
            Self::Refresh { .. } => TokenPurpose::Refresh,
            Self::Verification { .. } => TokenPurpose::Verification,
        }
    }

    fn role(&self) -> Option<Role> {
        match self {
            Self::Access { role, .. } => Some(*role),
            _ => None,
        }
    }
}

/// Wire-format claims inside a signed token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Purpose discriminator; absent or unknown values fail decoding
    pub purpose: TokenPurpose,
    /// Authorization role (access tokens only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Expiration timestamp (seconds)
    pub exp: i64,
    /// Unique token identifier
    ///
    /// Timestamps have one-second resolution, so two mints for the same
    /// subject in the same second would otherwise produce byte-identical
    /// tokens; rotation needs the retired token and its replacement to
    /// hash to different revocation keys.
    pub jti: Uuid,
}

impl Claims {
    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Remaining lifetime from now until expiry
    ///
    /// Clamped to one second so a revocation marker derived from it is
    /// always accepted by the store.
    pub fn remaining_lifetime(&self) -> Duration {
        let remaining = self.exp - Utc::now().timestamp();
        Duration::from_secs(remaining.max(1) as u64)
    }
}

/// Signing and verifying codec for session credentials
///
/// Deterministic given identical claims and timestamp. Verification
/// keeps the two failure kinds distinct: an expired signature maps to
/// [`AuthError::TokenExpired`], everything else (bad signature,
/// undecodable structure, missing claims, wrong purpose) maps to
/// [`AuthError::InvalidToken`].
#[derive(Clone)]
pub struct TokenCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec from a symmetric secret and HMAC algorithm
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        // The expiry window is the contract; no grace period.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            header: Header::new(algorithm),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Create a codec from the authority configuration
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.signing_secret.as_bytes(), config.algorithm)
    }

    /// Mint a signed token from a claim set
    ///
    /// Attaches `iat = now` and `exp = now + ttl`. Fails only on
    /// programmer errors: an empty subject, a zero TTL, or claims the
    /// serializer rejects.
    pub fn mint(&self, claims: &ClaimSet, ttl: Duration) -> Result<String, AuthError> {
        if claims.subject().is_empty() {
            return Err(AuthError::Internal(
                "claim subject must be non-empty".to_string(),
            ));
        }
        if ttl.is_zero() {
            return Err(AuthError::Internal("token ttl must be positive".to_string()));
        }

        let now = Utc::now().timestamp();
        let wire = Claims {
            sub: claims.subject().to_string(),
            purpose: claims.purpose(),
            role: claims.role(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            jti: Uuid::new_v4(),
        };

        encode(&self.header, &wire, &self.encoding_key).map_err(|e| {
            tracing::error!("failed to encode token: {}", e);
            AuthError::Internal("failed to encode token".to_string())
        })
    }

    /// Verify a token's signature, expiry, and purpose
    pub fn verify(&self, token: &str, expected: TokenPurpose) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("token verification failed: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        let claims = data.claims;

        if claims.sub.is_empty() {
            tracing::debug!("token carries an empty subject");
            return Err(AuthError::InvalidToken);
        }

        if claims.purpose != expected {
            tracing::debug!(
                "token purpose mismatch: expected {:?}, got {:?}",
                expected,
                claims.purpose
            );
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.header.alg)
            .finish_non_exhaustive()
    }
}
