//! Keycloak instances: admin connections.

use std::sync::Arc;

use async_trait::async_trait;
use kc_admin::{AdminConnector, Connections};
use kc_model::{Keycloak, ManagedResource};
use tracing::{info, warn};

use crate::error::ReconcileResult;
use crate::reconciler::{Reconciler, Removal};

/// Connects to declared Keycloak instances and registers the connections
/// under the resource name.
pub struct KeycloakReconciler {
    connector: Arc<dyn AdminConnector>,
    connections: Connections,
}

impl KeycloakReconciler {
    /// Creates the reconciler.
    pub fn new(connector: Arc<dyn AdminConnector>, connections: Connections) -> Self {
        Self {
            connector,
            connections,
        }
    }
}

#[async_trait]
impl Reconciler for KeycloakReconciler {
    type Resource = Keycloak;
    type Parent = ();

    async fn parent(&self, _resource: &Keycloak) -> ReconcileResult<()> {
        Ok(())
    }

    async fn reconcile(&self, _parent: &(), resource: &Keycloak) -> ReconcileResult<()> {
        let key = resource.key();
        let path = resource.path();

        match self.connector.connect(&key.namespace, &resource.spec).await {
            Ok(client) => {
                self.connections.insert(key.name, client);
                info!("{path}: connected to {}", resource.spec.url);
                Ok(())
            }
            Err(e) => {
                if self.connections.remove(&key.name) {
                    warn!("{path}: dropped previous connection");
                }
                Err(e.into())
            }
        }
    }

    async fn remove(&self, _parent: &(), resource: &Keycloak) -> ReconcileResult<Removal> {
        if self.connections.remove(&resource.key().name) {
            Ok(Removal::Deleted)
        } else {
            Ok(Removal::Absent)
        }
    }
}
