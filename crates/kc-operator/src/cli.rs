//! Command-line arguments.

use std::time::Duration;

use clap::Parser;
use kc_core::OperatorConfig;

fn duration(value: &str) -> kc_core::Result<Duration> {
    OperatorConfig::parse_duration(value)
}

/// Keycloak controller - keeps Keycloak in sync with custom resources.
#[derive(Debug, Parser)]
#[command(name = "kc-operator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Interval between retry sweeps over failed resources.
    #[arg(long, env = "KC_RETRY_RATE", default_value = "60s", value_parser = duration)]
    pub retry_rate: Duration,

    /// Namespace to watch (all namespaces if unset).
    #[arg(short, long, env = "KC_NAMESPACE")]
    pub namespace: Option<String>,

    /// Timeout for admin API requests.
    #[arg(long, env = "KC_HTTP_TIMEOUT", default_value = "30s", value_parser = duration)]
    pub http_timeout: Duration,

    /// Log filter directive.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Builds and validates the operator configuration.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if a value is out of range.
    pub fn into_config(self) -> kc_core::Result<OperatorConfig> {
        let config = OperatorConfig {
            retry_rate: self.retry_rate,
            namespace: self.namespace.filter(|ns| !ns.is_empty()),
            http_timeout: self.http_timeout,
            log_level: self.log_level,
        };
        config.validate()?;
        Ok(config)
    }
}
