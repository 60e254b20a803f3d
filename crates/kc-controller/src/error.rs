//! Reconciliation error types.

use kc_admin::AdminError;
use kc_store::StoreError;
use thiserror::Error;

/// Errors raised while reconciling one resource.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The admin API call failed.
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// The resource store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The parent context does not exist (yet).
    #[error("{reason}")]
    NotReady {
        /// What is missing.
        reason: String,
    },

    /// A declared collection names the same entry twice.
    #[error("{collection} '{name}' is declared more than once")]
    DuplicateName {
        /// Collection label, e.g. `mapper`.
        collection: &'static str,
        /// The repeated name.
        name: String,
    },
}

impl ReconcileError {
    /// Creates a not ready error.
    #[must_use]
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self::NotReady {
            reason: reason.into(),
        }
    }

    /// Checks if the parent context was missing.
    #[must_use]
    pub const fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }

    /// Returns the failure kind used as status prefix.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Admin(e) => e.kind(),
            Self::Store(_) => "StoreError",
            Self::NotReady { .. } => "NotReady",
            Self::DuplicateName { .. } => "DuplicateName",
        }
    }

    /// Returns the failure message.
    #[must_use]
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

/// Result type for reconciliation steps.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
