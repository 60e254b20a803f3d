//! Error handling for the Keycloak controller.

use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for operator-level failures.
///
/// Reconciliation failures never surface here: they end in a status write
/// or a log line. This type covers what can stop the process from starting.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A watch could not be opened or was closed unexpectedly.
    #[error("watch error: {0}")]
    Watch(String),
}

impl Error {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns whether this error is a configuration problem.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
