//! Admin passwords stored in Kubernetes Secrets.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kc_admin::{AdminError, AdminResult, PasswordSource};
use kc_model::KeycloakSpec;
use kube::api::Api;
use kube::Client;

/// Reads the admin password from the Secret named by a Keycloak resource.
///
/// The Secret lives in `passwordSecretNamespace`, or in the namespace of
/// the Keycloak resource when that is not set.
#[derive(Clone)]
pub struct SecretPasswordSource {
    client: Client,
}

impl SecretPasswordSource {
    /// Creates a password source.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PasswordSource for SecretPasswordSource {
    async fn password(&self, namespace: &str, spec: &KeycloakSpec) -> AdminResult<String> {
        let namespace = spec
            .password_secret_namespace
            .as_deref()
            .unwrap_or(namespace);
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        let secret = secrets
            .get_opt(&spec.password_secret_name)
            .await
            .map_err(|e| {
                AdminError::Credentials(format!(
                    "cannot read secret {namespace}/{}: {e}",
                    spec.password_secret_name
                ))
            })?
            .ok_or_else(|| {
                AdminError::Credentials(format!(
                    "secret {namespace}/{} not found",
                    spec.password_secret_name
                ))
            })?;

        password_from(&secret, &spec.password_secret_key)
    }
}

/// Extracts a UTF-8 password from a Secret key.
pub fn password_from(secret: &Secret, key: &str) -> AdminResult<String> {
    let name = secret.metadata.name.as_deref().unwrap_or_default();
    let bytes = secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .ok_or_else(|| AdminError::Credentials(format!("secret {name} has no key {key}")))?;

    String::from_utf8(bytes.0.clone())
        .map(|password| password.trim_end_matches('\n').to_string())
        .map_err(|_| AdminError::Credentials(format!("secret {name} key {key} is not UTF-8")))
}
