//! Cryptographic utilities
//!
//! Token strings never reach a store verbatim; they are hashed first so
//! a leaked revocation keyspace cannot be replayed as credentials.

use sha2::{Digest, Sha256};

/// Securely hash a token for storage.
///
/// Uses SHA-256 to create a one-way hash of the token. The original
/// token cannot be recovered from the hash.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
