//! The admin API capability used by the controllers.

use std::fmt;

use async_trait::async_trait;

use crate::dto::{
    ClientRepresentation, ClientScopeRepresentation, ProtocolMapperRepresentation,
    RealmRepresentation,
};
use crate::error::AdminResult;

/// Object owning a collection of protocol mappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperOwner<'a> {
    /// A client, by internal identifier.
    Client(&'a str),
    /// A client scope, by internal identifier.
    ClientScope(&'a str),
}

impl MapperOwner<'_> {
    /// Returns the owner's identifier.
    #[must_use]
    pub const fn id(&self) -> &str {
        match self {
            Self::Client(id) | Self::ClientScope(id) => *id,
        }
    }

    /// Returns the owner's collection path segment.
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        match self {
            Self::Client(_) => "clients",
            Self::ClientScope(_) => "client-scopes",
        }
    }
}

impl fmt::Display for MapperOwner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection(), self.id())
    }
}

/// Operations on a Keycloak admin API.
///
/// Objects are listed per parent and matched by name by the caller; writes
/// address them by the identifier Keycloak assigned. Realms are the
/// exception: the admin API addresses them by name.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait AdminClient: Send + Sync {
    /// Performs a cheap authenticated round trip.
    async fn server_info(&self) -> AdminResult<()>;

    // === Realms ===

    /// Gets a realm by name, `None` if it does not exist.
    async fn realm(&self, realm: &str) -> AdminResult<Option<RealmRepresentation>>;

    /// Creates a realm.
    async fn create_realm(&self, realm: &RealmRepresentation) -> AdminResult<()>;

    /// Updates a realm.
    async fn update_realm(&self, realm: &str, representation: &RealmRepresentation)
    -> AdminResult<()>;

    /// Deletes a realm.
    ///
    /// ## Errors
    ///
    /// Returns an API error with status 404 if the realm does not exist.
    async fn delete_realm(&self, realm: &str) -> AdminResult<()>;

    // === Clients ===

    /// Lists the clients of a realm.
    async fn clients(&self, realm: &str) -> AdminResult<Vec<ClientRepresentation>>;

    /// Creates a client and returns its identifier.
    async fn create_client(&self, realm: &str, client: &ClientRepresentation)
    -> AdminResult<String>;

    /// Updates a client.
    async fn update_client(
        &self,
        realm: &str,
        id: &str,
        client: &ClientRepresentation,
    ) -> AdminResult<()>;

    /// Deletes a client.
    async fn delete_client(&self, realm: &str, id: &str) -> AdminResult<()>;

    // === Client scopes ===

    /// Lists the client scopes of a realm.
    async fn client_scopes(&self, realm: &str) -> AdminResult<Vec<ClientScopeRepresentation>>;

    /// Creates a client scope and returns its identifier.
    async fn create_client_scope(
        &self,
        realm: &str,
        scope: &ClientScopeRepresentation,
    ) -> AdminResult<String>;

    /// Updates a client scope.
    async fn update_client_scope(
        &self,
        realm: &str,
        id: &str,
        scope: &ClientScopeRepresentation,
    ) -> AdminResult<()>;

    /// Deletes a client scope.
    async fn delete_client_scope(&self, realm: &str, id: &str) -> AdminResult<()>;

    // === Protocol mappers ===

    /// Lists the protocol mappers of a client or client scope.
    async fn protocol_mappers(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
    ) -> AdminResult<Vec<ProtocolMapperRepresentation>>;

    /// Creates a protocol mapper and returns its identifier.
    async fn create_protocol_mapper(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
        mapper: &ProtocolMapperRepresentation,
    ) -> AdminResult<String>;

    /// Updates a protocol mapper in place.
    async fn update_protocol_mapper(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
        id: &str,
        mapper: &ProtocolMapperRepresentation,
    ) -> AdminResult<()>;

    /// Deletes a protocol mapper.
    async fn delete_protocol_mapper(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
        id: &str,
    ) -> AdminResult<()>;
}
