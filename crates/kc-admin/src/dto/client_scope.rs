//! Client scope representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute key: include the scope in the token `scope` claim.
pub const INCLUDE_IN_TOKEN_SCOPE: &str = "include.in.token.scope";
/// Attribute key: show the scope on the consent screen.
pub const DISPLAY_ON_CONSENT_SCREEN: &str = "display.on.consent.screen";
/// Attribute key: consent screen text.
pub const CONSENT_SCREEN_TEXT: &str = "consent.screen.text";
/// Attribute key: admin console ordering hint.
pub const GUI_ORDER: &str = "gui.order";

/// A client scope as exchanged with the admin API.
///
/// Scope settings live in the string-valued `attributes` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientScopeRepresentation {
    /// Internal unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Scope name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Protocol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// String-valued scope attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,

    /// Attributes not managed by the controller.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClientScopeRepresentation {
    /// Creates a representation carrying only the scope name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a scope attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|a| a.get(key))
            .map(String::as_str)
    }
}
