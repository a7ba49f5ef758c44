//! Error types for the kv-storage library
//!
//! This module provides a unified error handling system using `thiserror` for
//! all storage adapters and clients.

use thiserror::Error;

/// The main error type for the kv-storage library
#[derive(Error, Debug)]
pub enum Error {
    /// Storage operation errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// No record is stored under the requested key
    #[error("Record not found: {key}")]
    NotFound { key: String },

    /// Input rejected before reaching the backend
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Record could not be encoded, or stored text is not a JSON object
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure reported by the underlying client, passed through untouched
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Storage operation failed
    #[error("Storage operation failed: {operation}: {reason}")]
    OperationFailed { operation: String, reason: String },

    /// I/O error from a file-backed client
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Wrap a client error without adding context
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StorageError::Backend(Box::new(err))
    }

    /// Whether this error signals a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience type alias for Storage Results
pub type StorageResult<T> = std::result::Result<T, StorageError>;
