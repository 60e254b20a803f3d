//! `ClientRepresentation` of the admin API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A client as listed by `GET /{realm}/clients`.
///
/// Only the fields a `KeycloakClient` can declare are typed; everything else
/// rides along in `extra` and is sent back untouched on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRepresentation {
    /// Server-assigned id, absent on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// OAuth `client_id`; clients are matched on it.
    pub client_id: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Disabled clients cannot obtain tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// `openid-connect` for every client the controller creates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// No client secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_client: Option<bool>,
    /// Only accepts bearer tokens, never starts a login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_only: Option<bool>,

    /// Authorization code grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_flow_enabled: Option<bool>,
    /// Implicit grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit_flow_enabled: Option<bool>,
    /// Resource owner password grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_access_grants_enabled: Option<bool>,
    /// Client credentials grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_accounts_enabled: Option<bool>,
    /// Ask users to grant the requested scopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_required: Option<bool>,

    /// Prefix for relative URLs below.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_url: Option<String>,
    /// Default landing URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Backchannel endpoint of the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_url: Option<String>,
    /// Redirect URI patterns, order is irrelevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uris: Option<Vec<String>>,
    /// CORS origins, order is irrelevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_origins: Option<Vec<String>>,

    /// Unmanaged attributes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClientRepresentation {
    /// Creates a representation carrying only the client id.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..Self::default()
        }
    }
}
