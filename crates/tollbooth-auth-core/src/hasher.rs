//! Password hashing
//!
//! The authority treats hashing as an opaque one-way primitive behind a
//! trait; policy selection lives with the implementation.

use crate::AuthError;

/// One-way password hashing primitive
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage
    fn hash(&self, plaintext: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored hash
    ///
    /// A malformed stored hash reads as a non-match; no detail leaks.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Bcrypt-backed hasher
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with the bcrypt default cost
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Create a hasher with an explicit cost factor
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| {
            tracing::error!("password hashing failed: {}", e);
            AuthError::Internal("password hashing failed".to_string())
        })
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost; the default is deliberately slow
    fn hasher() -> BcryptHasher {
        BcryptHasher::with_cost(4)
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let hasher = hasher();
        let hash = hasher.hash("correct horse battery staple").unwrap();
        assert!(hasher.verify("correct horse battery staple", &hash));
        assert!(!hasher.verify("wrong password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();
        let a = hasher.hash("password").unwrap();
        let b = hasher.hash("password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_stored_hash_is_non_match() {
        let hasher = hasher();
        assert!(!hasher.verify("password", "not-a-bcrypt-hash"));
        assert!(!hasher.verify("password", ""));
    }
}
