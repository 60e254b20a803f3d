//! Keycloak instance resource.
//!
//! Declares how to reach the admin API of one Keycloak installation. Other
//! kinds refer to it by resource name through their `keycloak` field.

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::resource::ManagedResource;
use crate::status::ResourceStatus;

/// Connection settings of a Keycloak instance.
#[derive(CustomResource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "k8s.kiwigrid.com",
    version = "v1beta1",
    kind = "Keycloak",
    namespaced,
    status = "ResourceStatus",
    shortname = "kc",
    derive = "PartialEq",
    printcolumn = r#"{"name":"Url","type":"string","jsonPath":".spec.url"}"#,
    printcolumn = r#"{"name":"Error","type":"string","jsonPath":".status.error"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakSpec {
    /// Base URL, e.g. `https://keycloak.example.com/auth`.
    pub url: String,
    /// Realm the admin user authenticates against.
    #[serde(default = "default_realm")]
    pub realm: String,
    /// Client used for the password grant.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Admin user name.
    #[serde(default = "default_username")]
    pub username: String,
    /// Namespace of the password secret (defaults to the resource namespace).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_secret_namespace: Option<String>,
    /// Name of the secret holding the admin password.
    pub password_secret_name: String,
    /// Key of the password inside the secret.
    #[serde(default = "default_password_key")]
    pub password_secret_key: String,
}

fn default_realm() -> String {
    "master".to_string()
}

fn default_client_id() -> String {
    "admin-cli".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password_key() -> String {
    "password".to_string()
}

impl KeycloakSpec {
    /// Creates a spec with default realm, client and user.
    #[must_use]
    pub fn new(url: impl Into<String>, password_secret_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            realm: default_realm(),
            client_id: default_client_id(),
            username: default_username(),
            password_secret_namespace: None,
            password_secret_name: password_secret_name.into(),
            password_secret_key: default_password_key(),
        }
    }
}

impl ManagedResource for Keycloak {
    const KIND: &'static str = "Keycloak";

    fn status(&self) -> Option<&ResourceStatus> {
        self.status.as_ref()
    }

    fn set_status(&mut self, status: ResourceStatus) {
        self.status = Some(status);
    }

    fn path(&self) -> String {
        self.name_any()
    }
}
