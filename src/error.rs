//! Error types for jsonstore
//!
//! Provides a unified error type for all operations.
//!
//! A record that does not exist is NOT an error: lookups return `Ok(None)`
//! and updates return `Ok(false)`. Every variant below is a real failure.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for jsonstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database directory or table file is absent
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Write failed after the table was read; the mutation was not committed
    #[error("Failed to persist {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    /// Table content is not JSON (strict decode mode only)
    #[error("Malformed table content: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Timed out after {waited_ms} ms waiting for lock on {}", path.display())]
    Timeout { path: PathBuf, waited_ms: u64 },

    // -------------------------------------------------------------------------
    // Naming Errors
    // -------------------------------------------------------------------------
    #[error("Invalid name: {0}")]
    InvalidName(String),
}

impl StoreError {
    /// Whether this error means the database or table does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
