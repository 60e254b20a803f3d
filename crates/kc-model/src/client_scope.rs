//! Client scope resource.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::mapper::MapperSpec;
use crate::resource::ManagedResource;
use crate::status::ResourceStatus;

/// Desired state of a client scope.
#[derive(CustomResource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "k8s.kiwigrid.com",
    version = "v1beta2",
    kind = "KeycloakClientScope",
    namespaced,
    status = "ResourceStatus",
    shortname = "kccs",
    derive = "PartialEq",
    printcolumn = r#"{"name":"Realm","type":"string","jsonPath":".spec.realm"}"#,
    printcolumn = r#"{"name":"Scope","type":"string","jsonPath":".spec.name"}"#,
    printcolumn = r#"{"name":"Error","type":"string","jsonPath":".status.error"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakClientScopeSpec {
    /// Name of the Keycloak resource hosting the realm.
    #[serde(default = "crate::default_keycloak")]
    pub keycloak: String,
    /// Realm name.
    pub realm: String,
    /// Scope name, the name the scope is matched by.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Protocol, `openid-connect` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Include the scope in the token `scope` claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_in_token_scope: Option<bool>,
    /// Show the scope on the consent screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_on_consent_screen: Option<bool>,
    /// Text shown on the consent screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_screen_text: Option<String>,
    /// Ordering hint for the admin console.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gui_order: Option<i32>,
    /// Protocol mappers owned by the scope.
    #[serde(default)]
    pub mappers: Vec<MapperSpec>,
}

impl KeycloakClientScopeSpec {
    /// Creates a spec for a scope on the default Keycloak.
    #[must_use]
    pub fn new(realm: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keycloak: crate::default_keycloak(),
            realm: realm.into(),
            name: name.into(),
            description: None,
            protocol: None,
            include_in_token_scope: None,
            display_on_consent_screen: None,
            consent_screen_text: None,
            gui_order: None,
            mappers: Vec::new(),
        }
    }
}

impl ManagedResource for KeycloakClientScope {
    const KIND: &'static str = "KeycloakClientScope";

    fn status(&self) -> Option<&ResourceStatus> {
        self.status.as_ref()
    }

    fn set_status(&mut self, status: ResourceStatus) {
        self.status = Some(status);
    }

    fn path(&self) -> String {
        format!(
            "{}/{}/client-scopes/{}",
            self.spec.keycloak, self.spec.realm, self.spec.name
        )
    }
}
