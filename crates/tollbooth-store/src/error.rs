//! Store errors

use thiserror::Error;

/// Errors surfaced by store backends
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not reach the backend
    #[error("store connection failed: {0}")]
    Connection(String),

    /// A bounded call did not complete in time
    #[error("store operation timed out")]
    Timeout,

    /// The backend reported a failure
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
