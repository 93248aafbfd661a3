//! Error types for hashtree
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using HashTreeError
pub type Result<T> = std::result::Result<T, HashTreeError>;

/// Unified error type for hashtree operations
#[derive(Debug, Error)]
pub enum HashTreeError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    /// A slot's byte range falls outside the mapped region. The index never
    /// grows the mapping on its own; callers must `grow` explicitly.
    #[error("slot {slot} out of mapped range ({mapped} bytes mapped)")]
    Capacity { slot: u64, mapped: usize },

    /// A key or value string did not decode to exactly one hash width.
    #[error("malformed content hash: {0:?} (expected 64 lowercase hex characters)")]
    MalformedHash(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for HashTreeError {
    fn from(e: serde_json::Error) -> Self {
        HashTreeError::Serialization(e.to_string())
    }
}
