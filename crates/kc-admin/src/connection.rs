//! Connections to Keycloak instances.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kc_model::KeycloakSpec;
use parking_lot::RwLock;
use tracing::debug;

use crate::api::AdminClient;
use crate::error::{AdminError, AdminResult};
use crate::http::{Credentials, HttpAdminClient};

/// Resolves the admin password for a Keycloak resource.
#[async_trait]
pub trait PasswordSource: Send + Sync {
    /// Returns the password for the given resource.
    ///
    /// `namespace` is the namespace of the Keycloak resource, used when
    /// `spec` names no secret namespace.
    async fn password(&self, namespace: &str, spec: &KeycloakSpec) -> AdminResult<String>;
}

/// A fixed password, for tests and local runs.
#[derive(Debug, Clone)]
pub struct StaticPassword(pub String);

#[async_trait]
impl PasswordSource for StaticPassword {
    async fn password(&self, _namespace: &str, _spec: &KeycloakSpec) -> AdminResult<String> {
        Ok(self.0.clone())
    }
}

/// Opens verified admin connections.
#[async_trait]
pub trait AdminConnector: Send + Sync {
    /// Connects to the instance described by `spec` and checks that it
    /// answers.
    async fn connect(
        &self,
        namespace: &str,
        spec: &KeycloakSpec,
    ) -> AdminResult<Arc<dyn AdminClient>>;
}

/// Connector producing [`HttpAdminClient`]s.
pub struct HttpConnector {
    passwords: Arc<dyn PasswordSource>,
    timeout: Duration,
}

impl HttpConnector {
    /// Creates a connector.
    pub fn new(passwords: Arc<dyn PasswordSource>, timeout: Duration) -> Self {
        Self { passwords, timeout }
    }
}

#[async_trait]
impl AdminConnector for HttpConnector {
    async fn connect(
        &self,
        namespace: &str,
        spec: &KeycloakSpec,
    ) -> AdminResult<Arc<dyn AdminClient>> {
        let password = self.passwords.password(namespace, spec).await?;
        if password.is_empty() {
            return Err(AdminError::Credentials(format!(
                "secret {} has an empty key {}",
                spec.password_secret_name, spec.password_secret_key
            )));
        }

        let credentials = Credentials {
            realm: spec.realm.clone(),
            client_id: spec.client_id.clone(),
            username: spec.username.clone(),
            password,
        };
        let client = HttpAdminClient::new(&spec.url, credentials, self.timeout)?;
        client.server_info().await?;
        debug!(url = %spec.url, "connected to keycloak");

        Ok(Arc::new(client))
    }
}

/// Live admin connections keyed by Keycloak resource name.
#[derive(Default, Clone)]
pub struct Connections {
    inner: Arc<RwLock<HashMap<String, Arc<dyn AdminClient>>>>,
}

impl Connections {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the connection for a Keycloak resource.
    #[must_use]
    pub fn get(&self, keycloak: &str) -> Option<Arc<dyn AdminClient>> {
        self.inner.read().get(keycloak).cloned()
    }

    /// Registers a connection, replacing any previous one.
    pub fn insert(&self, keycloak: impl Into<String>, client: Arc<dyn AdminClient>) {
        self.inner.write().insert(keycloak.into(), client);
    }

    /// Forgets a connection. Returns whether one was registered.
    pub fn remove(&self, keycloak: &str) -> bool {
        self.inner.write().remove(keycloak).is_some()
    }

    /// Returns the number of registered connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if no connection is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl std::fmt::Debug for Connections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.inner.read().keys().cloned().collect();
        f.debug_struct("Connections").field("keycloaks", &names).finish()
    }
}
