//! Tollbooth Auth Core - Token authority business logic
//!
//! Issuance, verification, rotation, and revocation of signed session
//! credentials (access/refresh token pairs), plus the one-shot
//! email-verification token flow.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod hasher;
pub mod session;
pub mod verification;

pub use codec::{ClaimSet, Claims, TokenCodec, TokenPurpose};
pub use config::{AuthConfig, ConfigError};
pub use error::AuthError;
pub use hasher::{BcryptHasher, PasswordHasher};
pub use session::{SessionAuthority, SessionPair};
pub use verification::VerificationFlow;
