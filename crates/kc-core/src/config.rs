//! Operator configuration.
//!
//! Values come from command-line flags with environment fallbacks (see the
//! `kc-operator` binary); this module only holds and validates them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default interval between two retry sweeps.
pub const DEFAULT_RETRY_RATE: Duration = Duration::from_secs(60);

/// Default timeout for a single admin API round trip.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration of the controller process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorConfig {
    /// Interval between retry sweeps over failed resources.
    #[serde(with = "humantime_serde")]
    pub retry_rate: Duration,

    /// Namespace to watch (`None` watches all namespaces).
    pub namespace: Option<String>,

    /// Timeout for admin API requests.
    #[serde(with = "humantime_serde")]
    pub http_timeout: Duration,

    /// Log filter directive.
    pub log_level: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            retry_rate: DEFAULT_RETRY_RATE,
            namespace: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            log_level: "info".to_string(),
        }
    }
}

impl OperatorConfig {
    /// Creates a configuration for testing with a short retry rate.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            retry_rate: Duration::from_millis(50),
            namespace: Some("default".to_string()),
            http_timeout: Duration::from_secs(5),
            log_level: "debug".to_string(),
        }
    }

    /// Validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if an interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.retry_rate.is_zero() {
            return Err(Error::config("retry rate must be greater than zero"));
        }
        if self.http_timeout.is_zero() {
            return Err(Error::config("http timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Parses a human readable duration such as `60s` or `2m`.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if the value is not a valid duration.
    pub fn parse_duration(value: &str) -> Result<Duration> {
        humantime::parse_duration(value.trim())
            .map_err(|e| Error::config(format!("invalid duration '{value}': {e}")))
    }
}

/// Serde support for Duration using humantime format.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        humantime::parse_duration(&value).map_err(serde::de::Error::custom)
    }
}
