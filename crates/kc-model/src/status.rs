//! Status subresource shared by every resource kind.

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of the last reconciliation attempt.
///
/// `error` is serialized even when empty so that a merge patch clears a
/// previously reported failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceStatus {
    /// When the last terminal outcome was recorded (second precision).
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Error of the last attempt, `None` when it succeeded.
    #[serde(default)]
    pub error: Option<String>,
}

impl ResourceStatus {
    /// Creates a status recorded at the given instant.
    #[must_use]
    pub fn at(instant: DateTime<Utc>, error: Option<String>) -> Self {
        Self {
            timestamp: Some(format_timestamp(instant)),
            error,
        }
    }

    /// Creates a status recorded now.
    #[must_use]
    pub fn now(error: Option<String>) -> Self {
        Self::at(Utc::now(), error)
    }

    /// Returns true if the last attempt failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Returns true if an attempt ever reached a terminal outcome.
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        self.timestamp.is_some()
    }
}

/// Formats an instant as ISO-8601 truncated to whole seconds.
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
