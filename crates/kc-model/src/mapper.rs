//! Protocol mapper declarations nested in client and client scope specs.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::OPENID_CONNECT;

/// A protocol mapper as declared in a spec.
///
/// Mappers are identified by name within their owner, never by the
/// identifier Keycloak assigns to them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapperSpec {
    /// Mapper name, unique within the owning client or scope.
    pub name: String,
    /// Mapper type identifier, e.g. `oidc-usermodel-attribute-mapper`.
    pub protocol_mapper: String,
    /// Protocol of the mapper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Mapper configuration. Absent and empty are the same.
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl MapperSpec {
    /// Creates a mapper declaration without configuration.
    #[must_use]
    pub fn new(name: impl Into<String>, protocol_mapper: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protocol_mapper: protocol_mapper.into(),
            protocol: None,
            config: BTreeMap::new(),
        }
    }

    /// Adds a configuration entry.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Returns the declared protocol or `openid-connect`.
    #[must_use]
    pub fn protocol(&self) -> &str {
        self.protocol.as_deref().unwrap_or(OPENID_CONNECT)
    }
}
