//! Realm resource.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::resource::ManagedResource;
use crate::status::ResourceStatus;

/// Desired state of a realm.
///
/// Every optional attribute left unset keeps whatever value the realm has
/// in Keycloak.
#[derive(CustomResource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "k8s.kiwigrid.com",
    version = "v1beta1",
    kind = "KeycloakRealm",
    namespaced,
    status = "ResourceStatus",
    shortname = "kcr",
    derive = "PartialEq",
    printcolumn = r#"{"name":"Realm","type":"string","jsonPath":".spec.realm"}"#,
    printcolumn = r#"{"name":"Error","type":"string","jsonPath":".status.error"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakRealmSpec {
    /// Name of the Keycloak resource hosting the realm.
    #[serde(default = "crate::default_keycloak")]
    pub keycloak: String,
    /// Realm name.
    pub realm: String,
    /// Whether the realm is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Display name with HTML markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name_html: Option<String>,
    /// Login page theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_theme: Option<String>,
    /// Account management theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_theme: Option<String>,
    /// Email theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_theme: Option<String>,
    /// SSL requirement (`all`, `external`, `none`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_required: Option<String>,
    /// Allow user self-registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_allowed: Option<bool>,
    /// Allow password reset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_allowed: Option<bool>,
    /// Offer "Remember Me" on login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
    /// Require email verification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_email: Option<bool>,
    /// Allow login with email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_with_email_allowed: Option<bool>,
}

impl KeycloakRealmSpec {
    /// Creates a spec for the realm on the default Keycloak.
    #[must_use]
    pub fn new(realm: impl Into<String>) -> Self {
        Self {
            keycloak: crate::default_keycloak(),
            realm: realm.into(),
            enabled: None,
            display_name: None,
            display_name_html: None,
            login_theme: None,
            account_theme: None,
            email_theme: None,
            ssl_required: None,
            registration_allowed: None,
            reset_password_allowed: None,
            remember_me: None,
            verify_email: None,
            login_with_email_allowed: None,
        }
    }
}

impl ManagedResource for KeycloakRealm {
    const KIND: &'static str = "KeycloakRealm";

    fn status(&self) -> Option<&ResourceStatus> {
        self.status.as_ref()
    }

    fn set_status(&mut self, status: ResourceStatus) {
        self.status = Some(status);
    }

    fn path(&self) -> String {
        format!("{}/{}", self.spec.keycloak, self.spec.realm)
    }
}
