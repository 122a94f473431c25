//! Error types and error handling

use crate::storage::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;

/// Page pipeline error type
///
/// Every variant is fatal for the request that raised it. The only failure
/// with a local recovery, a missing project shell, never surfaces here.
#[derive(Debug, Error)]
pub enum PageError {
    /// The public asset directory is missing and could not be created
    #[error("Failed to create asset directory {path}: {source}")]
    AssetDirectory {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying storage failure
        #[source]
        source: StorageError,
    },

    /// The vendored script could not be copied into the public directory
    #[error("Failed to copy asset from {from} to {to}: {source}")]
    AssetCopy {
        /// Vendored source location
        from: PathBuf,
        /// Destination inside the public directory
        to: PathBuf,
        /// Underlying storage failure
        #[source]
        source: StorageError,
    },

    /// The served script could not be read back for hashing
    #[error("Failed to read asset {path}: {source}")]
    AssetRead {
        /// Served asset location
        path: PathBuf,
        /// Underlying storage failure
        #[source]
        source: StorageError,
    },

    /// A component fragment could not be listed or read
    #[error("Failed to read component {path}: {source}")]
    ComponentRead {
        /// Fragment file or components directory
        path: PathBuf,
        /// Underlying storage failure
        #[source]
        source: StorageError,
    },

    /// The template references a component that was not loaded
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// A component references itself, directly or through other components
    #[error("Component cycle detected at: {0}")]
    ComponentCycle(String),

    /// A slot has no corresponding value
    #[error("Missing value for slot {index} ({provided} values provided)")]
    MissingValue {
        /// Slot index that was referenced
        index: usize,
        /// Number of values the caller supplied
        provided: usize,
    },

    /// A template needs at least one static segment
    #[error("Template must contain at least one static segment")]
    EmptyTemplate,

    /// Digest algorithm is not supported
    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A header value could not be read or constructed
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

/// Result type for page pipeline operations
pub type PageResult<T> = Result<T, PageError>;

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Page assembly failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
