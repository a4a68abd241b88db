//! Store and decode error types.
//!
//! Store backends wrap these in `anyhow::Error`; the engine never surfaces
//! them to callers, but keeping them typed lets logs and tests classify
//! failures without string matching.

use thiserror::Error;

/// Errors a store backend can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The read did not complete in time.
    #[error("store read timed out after {0}ms")]
    Timeout(u64),

    /// A stored document could not be interpreted.
    #[error("corrupt document in '{collection}': {message}")]
    Corrupt { collection: String, message: String },
}

impl StoreError {
    /// Returns `true` if a retry of the same read could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout(_))
    }
}

/// A legacy serialized cognitive profile that could not be decoded.
#[derive(Debug, Error)]
#[error("failed to decode legacy profile blob for user '{user_id}': {source}")]
pub struct ProfileDecodeError {
    pub user_id: String,
    #[source]
    pub source: serde_json::Error,
}
