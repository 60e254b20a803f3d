//! Outcome of one reconciliation attempt.

use tracing::{debug, error, warn};

use crate::error::ReconcileError;

/// What a reconciliation attempt ended with.
///
/// Logging and status writing both read from this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// The external object matches the declaration.
    Success,
    /// The parent context is missing; try again later.
    NotReady {
        /// What is missing.
        reason: String,
    },
    /// The attempt failed.
    Failure {
        /// Failure kind, e.g. `ApiError`.
        kind: &'static str,
        /// Failure message.
        detail: String,
    },
}

impl ReconciliationOutcome {
    /// Returns the status error to persist: `None` when nothing must be
    /// written, `Some(None)` on success.
    #[must_use]
    pub fn status_error(&self) -> Option<Option<String>> {
        match self {
            Self::Success => Some(None),
            Self::NotReady { .. } => None,
            Self::Failure { kind, detail } => Some(Some(format!("{kind}: {detail}"))),
        }
    }

    /// Returns true for success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true for failures.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Logs the outcome for the resource at `path`.
    pub fn log(&self, path: &str) {
        match self {
            Self::Success => debug!("{path}: reconciled"),
            Self::NotReady { reason } => warn!("{path}: skipped, {reason}"),
            Self::Failure { kind, detail } => error!("{path}: {kind}: {detail}"),
        }
    }
}

impl From<Result<(), ReconcileError>> for ReconciliationOutcome {
    fn from(result: Result<(), ReconcileError>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(ReconcileError::NotReady { reason }) => Self::NotReady { reason },
            Err(err) => Self::Failure {
                kind: err.kind(),
                detail: err.detail(),
            },
        }
    }
}
