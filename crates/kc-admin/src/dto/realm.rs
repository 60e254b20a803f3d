//! `RealmRepresentation` of the admin API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A realm as returned by `GET /admin/realms/{realm}`.
///
/// Realms carry far more settings than a `KeycloakRealm` declares; those
/// stay in `extra` so an update does not reset them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmRepresentation {
    /// Server-assigned id. Unused for addressing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Realm name, also its URL segment.
    pub realm: String,
    /// Disabled realms reject every login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Title shown on the login page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// HTML variant of the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name_html: Option<String>,

    /// Theme names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_theme: Option<String>,
    /// See `login_theme`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_theme: Option<String>,
    /// See `login_theme`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_theme: Option<String>,

    /// `all`, `external` or `none`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_required: Option<String>,
    /// Self-service sign up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_allowed: Option<bool>,
    /// Forgot-password link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_password_allowed: Option<bool>,
    /// Long-lived SSO cookie on request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
    /// Users confirm their address before logging in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_email: Option<bool>,
    /// Email address accepted as username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_with_email_allowed: Option<bool>,

    /// Unmanaged settings.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RealmRepresentation {
    /// Creates a representation carrying only the realm name.
    #[must_use]
    pub fn new(realm: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            ..Self::default()
        }
    }
}
