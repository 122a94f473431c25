//! Core types for file storage

use thiserror::Error;

/// Errors that can occur during file storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// File not found in storage
    #[error("File not found: {0}")]
    NotFound(String),

    /// I/O error during storage operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file path
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
