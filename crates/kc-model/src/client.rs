//! OAuth client resource.
//!
//! Clients represent applications that request authentication and
//! authorization from a realm (OAuth 2.0 / OIDC clients).

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mapper::MapperSpec;
use crate::resource::ManagedResource;
use crate::status::ResourceStatus;

/// Desired state of a client.
#[derive(CustomResource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "k8s.kiwigrid.com",
    version = "v1beta1",
    kind = "KeycloakClient",
    namespaced,
    status = "ResourceStatus",
    shortname = "kcc",
    derive = "PartialEq",
    printcolumn = r#"{"name":"Realm","type":"string","jsonPath":".spec.realm"}"#,
    printcolumn = r#"{"name":"Client","type":"string","jsonPath":".spec.clientId"}"#,
    printcolumn = r#"{"name":"Error","type":"string","jsonPath":".status.error"}"#
)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct KeycloakClientSpec {
    /// Name of the Keycloak resource hosting the realm.
    #[serde(default = "crate::default_keycloak")]
    pub keycloak: String,
    /// Realm name.
    pub realm: String,
    /// OAuth `client_id`, the name the client is matched by.
    pub client_id: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the client is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    // === Client Type ===
    /// Public client (no secret).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_client: Option<bool>,
    /// Bearer-only client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_only: Option<bool>,

    // === OAuth Flows ===
    /// Enable Authorization Code flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_flow_enabled: Option<bool>,
    /// Enable Implicit flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit_flow_enabled: Option<bool>,
    /// Enable Direct Access Grants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_access_grants_enabled: Option<bool>,
    /// Enable Service Account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_accounts_enabled: Option<bool>,
    /// Require user consent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_required: Option<bool>,

    // === URLs ===
    /// Root URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_url: Option<String>,
    /// Base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Admin URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_url: Option<String>,
    /// Allowed redirect URIs (compared as a set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uris: Option<Vec<String>>,
    /// Allowed web origins (compared as a set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_origins: Option<Vec<String>>,

    /// Protocol mappers owned by the client.
    #[serde(default)]
    pub mappers: Vec<MapperSpec>,
}

impl KeycloakClientSpec {
    /// Creates a spec for a client on the default Keycloak.
    #[must_use]
    pub fn new(realm: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            keycloak: crate::default_keycloak(),
            realm: realm.into(),
            client_id: client_id.into(),
            name: None,
            description: None,
            enabled: None,
            public_client: None,
            bearer_only: None,
            standard_flow_enabled: None,
            implicit_flow_enabled: None,
            direct_access_grants_enabled: None,
            service_accounts_enabled: None,
            consent_required: None,
            root_url: None,
            base_url: None,
            admin_url: None,
            redirect_uris: None,
            web_origins: None,
            mappers: Vec::new(),
        }
    }
}

impl ManagedResource for KeycloakClient {
    const KIND: &'static str = "KeycloakClient";

    fn status(&self) -> Option<&ResourceStatus> {
        self.status.as_ref()
    }

    fn set_status(&mut self, status: ResourceStatus) {
        self.status = Some(status);
    }

    fn path(&self) -> String {
        format!(
            "{}/{}/clients/{}",
            self.spec.keycloak, self.spec.realm, self.spec.client_id
        )
    }
}
