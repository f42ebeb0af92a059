//! Error types for MetaView
//!
//! Not-found is deliberately absent: a missing resource is reported as an
//! `ItemInfo` with `ItemKind::NotFound`, never as an error.

use crate::types::{ResourceId, ResourceIdError};
use thiserror::Error;

/// Common result type for MetaView operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for MetaView
#[derive(Debug, Error)]
pub enum Error {
    #[error("operation not supported by this storage view: {operation}")]
    Unsupported { operation: String },

    #[error("cache entry missing info for name '{0}'")]
    MissingItemInfo(ResourceId),

    #[error("invalid resource id: {0}")]
    InvalidResourceId(#[from] ResourceIdError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an unsupported-operation error
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is an unsupported-operation error
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Check if this error signals a broken internal invariant
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingItemInfo(_) | Self::Internal(_))
    }

    /// Check if this is a retryable error
    ///
    /// Nothing here talks to a remote store, so no error is transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Deserialization(e.to_string())
    }
}
