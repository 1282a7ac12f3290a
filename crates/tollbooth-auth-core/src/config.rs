//! Configuration types for the token authority

use jsonwebtoken::Algorithm;
use std::time::Duration;

/// Token authority configuration
///
/// Immutable after startup; the signing secret is injected here and
/// handed to the codec as an explicit dependency, never read from a
/// global.
#[derive(Clone)]
pub struct AuthConfig {
    /// Symmetric signing secret (minimum 32 bytes)
    pub signing_secret: String,
    /// HMAC signing algorithm
    pub algorithm: Algorithm,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
    /// Email-verification token lifetime
    pub verification_ttl: Duration,
    /// Upper bound on any single collaborator call
    pub dependency_timeout: Duration,
}

impl AuthConfig {
    /// Minimum signing secret length in bytes (256 bits)
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a config with default lifetimes
    ///
    /// Defaults: HS256, 15 minute access tokens, 7 day refresh tokens,
    /// 15 minute verification tokens, 5 second dependency timeout.
    ///
    /// # Errors
    /// Returns an error if the secret is shorter than 32 bytes.
    pub fn new(signing_secret: impl Into<String>) -> Result<Self, ConfigError> {
        let signing_secret = signing_secret.into();
        if signing_secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid(
                "SECRET_KEY must be at least 32 bytes",
            ));
        }

        Ok(Self {
            signing_secret,
            algorithm: Algorithm::HS256,
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            verification_ttl: Duration::from_secs(15 * 60),
            dependency_timeout: Duration::from_secs(5),
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret =
            std::env::var("SECRET_KEY").map_err(|_| ConfigError::Missing("SECRET_KEY"))?;

        let mut config = Self::new(secret)?;

        if let Ok(raw) = std::env::var("ALGORITHM") {
            let algorithm = raw
                .parse::<Algorithm>()
                .map_err(|_| ConfigError::Invalid("ALGORITHM"))?;
            config = config.with_algorithm(algorithm)?;
        }

        if let Ok(raw) = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            let minutes: u64 = raw
                .parse()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_EXPIRE_MINUTES"))?;
            config.access_ttl = Duration::from_secs(minutes * 60);
        }

        if let Ok(raw) = std::env::var("REFRESH_TOKEN_EXPIRE_DAYS") {
            let days: u64 = raw
                .parse()
                .map_err(|_| ConfigError::Invalid("REFRESH_TOKEN_EXPIRE_DAYS"))?;
            config.refresh_ttl = Duration::from_secs(days * 24 * 60 * 60);
        }

        if let Ok(raw) = std::env::var("VERIFICATION_TOKEN_EXPIRE_MINUTES") {
            let minutes: u64 = raw
                .parse()
                .map_err(|_| ConfigError::Invalid("VERIFICATION_TOKEN_EXPIRE_MINUTES"))?;
            config.verification_ttl = Duration::from_secs(minutes * 60);
        }

        if let Ok(raw) = std::env::var("DEPENDENCY_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ConfigError::Invalid("DEPENDENCY_TIMEOUT_SECS"))?;
            config.dependency_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the signing algorithm
    ///
    /// # Errors
    /// Returns an error for non-HMAC algorithms; the authority targets
    /// a single symmetric-key deployment.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Result<Self, ConfigError> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::Invalid(
                "ALGORITHM must be an HMAC variant (HS256, HS384, HS512)",
            ));
        }
        self.algorithm = algorithm;
        Ok(self)
    }

    /// Set access token lifetime
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Set refresh token lifetime
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Set verification token lifetime
    pub fn with_verification_ttl(mut self, ttl: Duration) -> Self {
        self.verification_ttl = ttl;
        self
    }

    /// Set the collaborator call timeout
    pub fn with_dependency_timeout(mut self, timeout: Duration) -> Self {
        self.dependency_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("verification_ttl", &self.verification_ttl)
            .field("dependency_timeout", &self.dependency_timeout)
            .finish_non_exhaustive()
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
