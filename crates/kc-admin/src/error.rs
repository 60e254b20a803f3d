//! Admin client error types.
//!
//! Every failure carries a stable [`AdminError::kind`] which prefixes the
//! text persisted to a resource status.

use thiserror::Error;

/// Errors that can occur while talking to the admin API.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The admin API answered with a non-success status.
    #[error("Keycloak returned {status} with: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The service violated its documented contract, e.g. a create call
    /// reported success without a usable identifier.
    #[error("{0}")]
    Protocol(String),

    /// Token acquisition failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured server URL is unusable.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The admin password could not be resolved.
    #[error("credentials unavailable: {0}")]
    Credentials(String),
}

impl AdminError {
    /// Creates an API error.
    #[must_use]
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Creates a protocol violation error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Returns the HTTP status reported by the service, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Checks if the service reported that the object does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Checks if the service rejected the credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns the failure kind used as status prefix.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Api { .. } => "ApiError",
            Self::Protocol(_) => "ProtocolViolation",
            Self::Auth(_) => "AuthenticationError",
            Self::Http(_) => "HttpError",
            Self::Json(_) => "JsonError",
            Self::InvalidUrl(_) => "InvalidUrl",
            Self::Credentials(_) => "CredentialsError",
        }
    }
}

/// Result type for admin client operations.
pub type AdminResult<T> = Result<T, AdminError>;
