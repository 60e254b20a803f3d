//! Protocol mapper representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A protocol mapper as exchanged with the admin API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolMapperRepresentation {
    /// Internal unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Mapper name.
    pub name: String,
    /// Protocol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Mapper type identifier.
    pub protocol_mapper: String,
    /// Mapper configuration.
    #[serde(default)]
    pub config: BTreeMap<String, String>,

    /// Attributes not managed by the controller.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProtocolMapperRepresentation {
    /// Creates a mapper with the given name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, protocol_mapper: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protocol_mapper: protocol_mapper.into(),
            ..Self::default()
        }
    }
}
