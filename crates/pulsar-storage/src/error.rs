//! Storage error types for pulsar-storage.
//!
//! [`StorageError`] covers every failure a persistence backend can report:
//! database and migration errors, records that do not decode, and a backend
//! that cannot be reached at all.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite reported an error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored record exists but does not have the expected shape.
    #[error("corrupt record: {reason}")]
    CorruptRecord { reason: String },

    /// Project paths are stored as text and must be valid UTF-8.
    #[error("path is not valid UTF-8: {}", .path.display())]
    InvalidPath { path: PathBuf },

    /// The backend cannot be reached.
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },
}
