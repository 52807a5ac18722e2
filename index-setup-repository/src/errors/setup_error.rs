//! Setup error types.
//!
//! This module defines the error types that can occur while talking to the
//! search service's administrative API.

use thiserror::Error;

/// Errors that can occur during index setup operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The search service could not be reached, or its health probe failed.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Input rejected locally before any remote call.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The service reported that the index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// A remote task finished in the failed state.
    #[error("Task {task_uid} failed: {message}")]
    TaskFailed { task_uid: u32, message: String },

    /// Waiting for a remote task exceeded the configured timeout.
    #[error("Task timed out: {0}")]
    TaskTimeout(String),

    /// Any other error answered by the service.
    #[error("Remote error: {0}")]
    RemoteError(String),

    /// Failed to serialize a payload or parse a response.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SetupError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an index not found error.
    pub fn index_not_found(index_name: impl Into<String>) -> Self {
        Self::IndexNotFound(index_name.into())
    }

    /// Create a task failure error.
    pub fn task_failed(task_uid: u32, msg: impl Into<String>) -> Self {
        Self::TaskFailed {
            task_uid,
            message: msg.into(),
        }
    }

    /// Create a task timeout error.
    pub fn task_timeout(msg: impl Into<String>) -> Self {
        Self::TaskTimeout(msg.into())
    }

    /// Create a remote error.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IndexNotFound(_))
    }
}
