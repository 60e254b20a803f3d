//! # kc-operator
//!
//! Wires the Kubernetes stores, the Keycloak admin connector and the four
//! controllers together, and runs them until a shutdown signal arrives.
//!
//! ## Usage
//!
//! ```ignore
//! use kc_operator::Operator;
//!
//! let operator = Operator::new(config).await?;
//! operator.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod cli;

pub use cli::Cli;

use std::sync::Arc;

use kc_admin::{Connections, HttpConnector};
use kc_controller::{
    ClientReconciler, ClientScopeReconciler, Controller, KeycloakReconciler, ManagedController,
    RealmReconciler, Supervisor,
};
use kc_core::{Error, OperatorConfig};
use kc_model::{Keycloak, KeycloakClient, KeycloakClientScope, KeycloakRealm, ManagedResource};
use kc_store::ResourceStore;
use kc_store_kube::{KubeStore, SecretPasswordSource};

/// The controller process.
pub struct Operator {
    config: OperatorConfig,
    client: kube::Client,
}

impl Operator {
    /// Connects to the cluster from the ambient kubeconfig or service
    /// account.
    pub async fn new(config: OperatorConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let client = kube::Client::try_default().await?;
        tracing::info!(namespace = ?config.namespace, "Kubernetes client created");
        Ok(Self { config, client })
    }

    /// Returns the operator configuration.
    #[must_use]
    pub const fn config(&self) -> &OperatorConfig {
        &self.config
    }

    fn store<K: ManagedResource>(&self) -> Arc<dyn ResourceStore<K>> {
        Arc::new(KubeStore::new(
            self.client.clone(),
            self.config.namespace.clone(),
        ))
    }

    /// Builds the four controllers. Keycloak comes first so connections
    /// exist before their realms are looked at.
    fn controllers(&self) -> Vec<Arc<dyn ManagedController>> {
        let connections = Connections::new();
        let passwords = Arc::new(SecretPasswordSource::new(self.client.clone()));
        let connector = Arc::new(HttpConnector::new(passwords, self.config.http_timeout));

        let keycloaks: Arc<dyn ManagedController> = Arc::new(Controller::new(
            KeycloakReconciler::new(connector, connections.clone()),
            self.store::<Keycloak>(),
        ));
        let realms: Arc<dyn ManagedController> = Arc::new(Controller::new(
            RealmReconciler::new(connections.clone()),
            self.store::<KeycloakRealm>(),
        ));
        let clients: Arc<dyn ManagedController> = Arc::new(Controller::new(
            ClientReconciler::new(connections.clone()),
            self.store::<KeycloakClient>(),
        ));
        let scopes: Arc<dyn ManagedController> = Arc::new(Controller::new(
            ClientScopeReconciler::new(connections),
            self.store::<KeycloakClientScope>(),
        ));
        vec![keycloaks, realms, clients, scopes]
    }

    /// Runs the controllers until a shutdown signal arrives.
    pub async fn run(self) -> anyhow::Result<()> {
        let supervisor = Supervisor::start(self.controllers(), self.config.retry_rate)
            .await
            .map_err(|e| Error::Watch(e.to_string()))?;

        shutdown_signal().await;

        supervisor.shutdown().await;
        tracing::info!("Shutdown complete");
        Ok(())
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
