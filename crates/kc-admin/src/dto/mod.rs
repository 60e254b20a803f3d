//! Admin REST representations.
//!
//! These mirror the JSON bodies of the Keycloak admin API. Attributes the
//! controller does not manage are kept in a flattened `extra` map so that an
//! update writes back exactly what was read.

pub mod client;
pub mod client_scope;
pub mod protocol_mapper;
pub mod realm;

pub use client::ClientRepresentation;
pub use client_scope::{
    CONSENT_SCREEN_TEXT, ClientScopeRepresentation, DISPLAY_ON_CONSENT_SCREEN, GUI_ORDER,
    INCLUDE_IN_TOKEN_SCOPE,
};
pub use protocol_mapper::ProtocolMapperRepresentation;
pub use realm::RealmRepresentation;
