//! Store error types.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Resource not found.
    #[error("{kind} {key} not found")]
    NotFound {
        /// Resource kind.
        kind: &'static str,
        /// `namespace/name` of the resource.
        key: String,
    },

    /// The write lost against a concurrent change.
    #[error("Conflicting write to {kind} {key}")]
    Conflict {
        /// Resource kind.
        kind: &'static str,
        /// `namespace/name` of the resource.
        key: String,
    },

    /// The backing store failed.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// The store or subscription has been closed.
    #[error("Store closed")]
    Closed,
}

impl StoreError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(kind: &'static str, key: impl ToString) -> Self {
        Self::Conflict {
            kind,
            key: key.to_string(),
        }
    }

    /// Creates a backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Checks if this is a conflict error.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
