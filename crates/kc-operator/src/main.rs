//! # Keycloak controller
//!
//! Main entry point for the controller process.

#![forbid(unsafe_code)]
#![deny(warnings)]

use clap::Parser;
use kc_operator::{Cli, Operator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Cli::parse().into_config()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(retry_rate = ?config.retry_rate, "Keycloak controller starting...");

    let operator = Operator::new(config).await?;
    operator.run().await
}
