//! Auth errors

use thiserror::Error;
use tollbooth_store::StoreError;

/// Authentication errors
///
/// Every variant is terminal for the current request. [`Unavailable`]
/// is the only kind a caller should retry; it signals an
/// infrastructure hiccup, not an auth decision.
///
/// [`Unavailable`]: AuthError::Unavailable
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are deliberately
    /// indistinguishable to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account exists but has been disabled
    #[error("account disabled")]
    AccountDisabled,

    /// Account exists but its email has not been verified
    #[error("account not verified")]
    AccountUnverified,

    /// No user record for the token's subject
    #[error("user not found")]
    UserNotFound,

    /// The email is already registered
    #[error("email already registered")]
    EmailTaken,

    /// No token was presented
    #[error("missing token")]
    MissingToken,

    /// Token is past its expiry
    #[error("token expired")]
    TokenExpired,

    /// Token is malformed, forged, or carries the wrong claims
    #[error("invalid token")]
    InvalidToken,

    /// Token has been explicitly revoked
    #[error("token revoked")]
    TokenRevoked,

    /// A collaborator (store, directory) could not be reached in time
    #[error("dependency unavailable: {0}")]
    Unavailable(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials
            | Self::MissingToken
            | Self::TokenExpired
            | Self::InvalidToken
            | Self::TokenRevoked => 401,
            Self::AccountDisabled | Self::AccountUnverified => 403,
            Self::UserNotFound => 404,
            Self::EmailTaken => 409,
            Self::Unavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::AccountUnverified => "ACCOUNT_UNVERIFIED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::MissingToken => "MISSING_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenRevoked => "TOKEN_REVOKED",
            Self::Unavailable(_) => "DEPENDENCY_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether a caller may retry the request with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        tracing::error!("store error: {}", err);
        Self::Unavailable(err.to_string())
    }
}
