//! In-process admin API for end-to-end reconciliation tests.
//!
//! [`FakeAdmin`] keeps realms, clients, client scopes and protocol mappers
//! in memory, answers like the admin REST API does (404 on unknown objects,
//! 409 on duplicate names, identifiers taken from a `Location`) and records
//! every call so tests can assert on the exact writes a reconciliation made.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use kc_admin::dto::{
    ClientRepresentation, ClientScopeRepresentation, ProtocolMapperRepresentation,
    RealmRepresentation,
};
use kc_admin::location::created_id;
use kc_admin::{AdminClient, AdminConnector, AdminError, AdminResult, MapperOwner};
use kc_model::KeycloakSpec;
use parking_lot::Mutex;
use uuid::Uuid;

const BASE: &str = "http://keycloak.test/admin/realms";

#[derive(Default)]
struct State {
    realms: BTreeMap<String, RealmRepresentation>,
    clients: BTreeMap<String, Vec<ClientRepresentation>>,
    scopes: BTreeMap<String, Vec<ClientScopeRepresentation>>,
    mappers: HashMap<String, Vec<ProtocolMapperRepresentation>>,
    calls: Vec<String>,
    failures: HashMap<String, VecDeque<u16>>,
}

impl State {
    /// Logs a call and fails it if a failure was queued for it.
    fn record(&mut self, call: String) -> AdminResult<()> {
        let failure = self.failures.get_mut(&call).and_then(VecDeque::pop_front);
        self.calls.push(call);
        match failure {
            Some(status) => Err(AdminError::api(status, "injected failure")),
            None => Ok(()),
        }
    }

    fn client_id_of(&self, realm: &str, id: &str) -> String {
        self.clients
            .get(realm)
            .and_then(|clients| clients.iter().find(|c| c.id.as_deref() == Some(id)))
            .map_or_else(|| id.to_string(), |c| c.client_id.clone())
    }

    fn scope_name_of(&self, realm: &str, id: &str) -> String {
        self.scopes
            .get(realm)
            .and_then(|scopes| scopes.iter().find(|s| s.id.as_deref() == Some(id)))
            .map_or_else(|| id.to_string(), |s| s.name.clone())
    }

    fn mapper_name_of(&self, owner: &str, id: &str) -> String {
        self.mappers
            .get(owner)
            .and_then(|mappers| mappers.iter().find(|m| m.id.as_deref() == Some(id)))
            .map_or_else(|| id.to_string(), |m| m.name.clone())
    }

    fn require_realm(&self, realm: &str) -> AdminResult<()> {
        if self.realms.contains_key(realm) {
            Ok(())
        } else {
            Err(not_found(format!("Realm {realm} not found")))
        }
    }

    fn require_owner(&self, realm: &str, owner: MapperOwner<'_>) -> AdminResult<()> {
        let exists = match owner {
            MapperOwner::Client(id) => self
                .clients
                .get(realm)
                .is_some_and(|c| c.iter().any(|c| c.id.as_deref() == Some(id))),
            MapperOwner::ClientScope(id) => self
                .scopes
                .get(realm)
                .is_some_and(|s| s.iter().any(|s| s.id.as_deref() == Some(id))),
        };
        if exists {
            Ok(())
        } else {
            Err(not_found(format!("Could not find {owner}")))
        }
    }
}

fn not_found(message: String) -> AdminError {
    AdminError::api(404, format!(r#"{{"error":"{message}"}}"#))
}

fn conflict(message: String) -> AdminError {
    AdminError::api(409, format!(r#"{{"errorMessage":"{message}"}}"#))
}

/// Assigns an identifier and resolves it back from the `Location` the
/// admin API would send.
fn assign_id(collection_path: &str) -> AdminResult<String> {
    let location = format!("{BASE}/{collection_path}/{}", Uuid::new_v4());
    created_id(201, Some(location.as_str()), "")
}

/// Admin API held in memory.
#[derive(Default)]
pub struct FakeAdmin {
    state: Mutex<State>,
}

impl FakeAdmin {
    /// Creates an empty instance.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // === Setup ===

    /// Adds a realm without recording a call.
    pub fn seed_realm(&self, realm: RealmRepresentation) {
        self.state.lock().realms.insert(realm.realm.clone(), realm);
    }

    /// Adds a client without recording a call. Returns its identifier.
    pub fn seed_client(&self, realm: &str, mut client: ClientRepresentation) -> String {
        let id = Uuid::new_v4().to_string();
        client.id = Some(id.clone());
        self.state
            .lock()
            .clients
            .entry(realm.to_string())
            .or_default()
            .push(client);
        id
    }

    /// Adds a protocol mapper without recording a call. Returns its
    /// identifier.
    pub fn seed_mapper(&self, owner: &str, mut mapper: ProtocolMapperRepresentation) -> String {
        let id = Uuid::new_v4().to_string();
        mapper.id = Some(id.clone());
        self.state
            .lock()
            .mappers
            .entry(owner.to_string())
            .or_default()
            .push(mapper);
        id
    }

    /// Fails the next occurrence of `call` with `status`. Queued failures
    /// for the same call are consumed in order.
    pub fn fail(&self, call: &str, status: u16) {
        self.state
            .lock()
            .failures
            .entry(call.to_string())
            .or_default()
            .push_back(status);
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    // === Inspection ===

    /// Returns every recorded call, e.g. `create_protocol_mapper email`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Returns the recorded create, update and delete calls.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| {
                c.starts_with("create_") || c.starts_with("update_") || c.starts_with("delete_")
            })
            .collect()
    }

    /// Counts the recorded occurrences of `call`.
    #[must_use]
    pub fn count(&self, call: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| *c == call).count()
    }

    /// Returns a realm as stored.
    #[must_use]
    pub fn stored_realm(&self, realm: &str) -> Option<RealmRepresentation> {
        self.state.lock().realms.get(realm).cloned()
    }

    /// Returns a client as stored.
    #[must_use]
    pub fn stored_client(&self, realm: &str, client_id: &str) -> Option<ClientRepresentation> {
        let state = self.state.lock();
        state
            .clients
            .get(realm)?
            .iter()
            .find(|c| c.client_id == client_id)
            .cloned()
    }

    /// Returns a client scope as stored.
    #[must_use]
    pub fn stored_scope(&self, realm: &str, name: &str) -> Option<ClientScopeRepresentation> {
        let state = self.state.lock();
        state
            .scopes
            .get(realm)?
            .iter()
            .find(|s| s.name == name)
            .cloned()
    }

    /// Returns the mappers of an owner as stored, sorted by name.
    #[must_use]
    pub fn stored_mappers(&self, owner: &str) -> Vec<ProtocolMapperRepresentation> {
        let mut mappers = self
            .state
            .lock()
            .mappers
            .get(owner)
            .cloned()
            .unwrap_or_default();
        mappers.sort_by(|a, b| a.name.cmp(&b.name));
        mappers
    }
}

#[async_trait]
impl AdminClient for FakeAdmin {
    async fn server_info(&self) -> AdminResult<()> {
        self.state.lock().record("server_info".to_string())
    }

    async fn realm(&self, realm: &str) -> AdminResult<Option<RealmRepresentation>> {
        let mut state = self.state.lock();
        state.record(format!("realm {realm}"))?;
        Ok(state.realms.get(realm).cloned())
    }

    async fn create_realm(&self, realm: &RealmRepresentation) -> AdminResult<()> {
        let mut state = self.state.lock();
        state.record(format!("create_realm {}", realm.realm))?;
        if state.realms.contains_key(&realm.realm) {
            return Err(conflict(format!("Realm {} already exists", realm.realm)));
        }
        let mut stored = realm.clone();
        stored.id = Some(Uuid::new_v4().to_string());
        state.realms.insert(realm.realm.clone(), stored);
        Ok(())
    }

    async fn update_realm(
        &self,
        realm: &str,
        representation: &RealmRepresentation,
    ) -> AdminResult<()> {
        let mut state = self.state.lock();
        state.record(format!("update_realm {realm}"))?;
        state.require_realm(realm)?;
        state.realms.insert(realm.to_string(), representation.clone());
        Ok(())
    }

    async fn delete_realm(&self, realm: &str) -> AdminResult<()> {
        let mut state = self.state.lock();
        state.record(format!("delete_realm {realm}"))?;
        state.require_realm(realm)?;
        state.realms.remove(realm);
        state.clients.remove(realm);
        state.scopes.remove(realm);
        Ok(())
    }

    async fn clients(&self, realm: &str) -> AdminResult<Vec<ClientRepresentation>> {
        let mut state = self.state.lock();
        state.record(format!("clients {realm}"))?;
        state.require_realm(realm)?;
        Ok(state.clients.get(realm).cloned().unwrap_or_default())
    }

    async fn create_client(
        &self,
        realm: &str,
        client: &ClientRepresentation,
    ) -> AdminResult<String> {
        let mut state = self.state.lock();
        state.record(format!("create_client {}", client.client_id))?;
        state.require_realm(realm)?;
        let clients = state.clients.entry(realm.to_string()).or_default();
        if clients.iter().any(|c| c.client_id == client.client_id) {
            return Err(conflict(format!(
                "Client {} already exists",
                client.client_id
            )));
        }
        let id = assign_id(&format!("{realm}/clients"))?;
        clients.push(ClientRepresentation {
            id: Some(id.clone()),
            ..client.clone()
        });
        Ok(id)
    }

    async fn update_client(
        &self,
        realm: &str,
        id: &str,
        client: &ClientRepresentation,
    ) -> AdminResult<()> {
        let mut state = self.state.lock();
        let call = format!("update_client {}", state.client_id_of(realm, id));
        state.record(call)?;
        let stored = state
            .clients
            .get_mut(realm)
            .and_then(|clients| clients.iter_mut().find(|c| c.id.as_deref() == Some(id)))
            .ok_or_else(|| not_found("Could not find client".to_string()))?;
        *stored = ClientRepresentation {
            id: Some(id.to_string()),
            ..client.clone()
        };
        Ok(())
    }

    async fn delete_client(&self, realm: &str, id: &str) -> AdminResult<()> {
        let mut state = self.state.lock();
        let call = format!("delete_client {}", state.client_id_of(realm, id));
        state.record(call)?;
        let clients = state.clients.entry(realm.to_string()).or_default();
        let before = clients.len();
        clients.retain(|c| c.id.as_deref() != Some(id));
        if clients.len() == before {
            return Err(not_found("Could not find client".to_string()));
        }
        state.mappers.remove(id);
        Ok(())
    }

    async fn client_scopes(&self, realm: &str) -> AdminResult<Vec<ClientScopeRepresentation>> {
        let mut state = self.state.lock();
        state.record(format!("client_scopes {realm}"))?;
        state.require_realm(realm)?;
        Ok(state.scopes.get(realm).cloned().unwrap_or_default())
    }

    async fn create_client_scope(
        &self,
        realm: &str,
        scope: &ClientScopeRepresentation,
    ) -> AdminResult<String> {
        let mut state = self.state.lock();
        state.record(format!("create_client_scope {}", scope.name))?;
        state.require_realm(realm)?;
        let scopes = state.scopes.entry(realm.to_string()).or_default();
        if scopes.iter().any(|s| s.name == scope.name) {
            return Err(conflict(format!(
                "Client Scope {} already exists",
                scope.name
            )));
        }
        let id = assign_id(&format!("{realm}/client-scopes"))?;
        scopes.push(ClientScopeRepresentation {
            id: Some(id.clone()),
            ..scope.clone()
        });
        Ok(id)
    }

    async fn update_client_scope(
        &self,
        realm: &str,
        id: &str,
        scope: &ClientScopeRepresentation,
    ) -> AdminResult<()> {
        let mut state = self.state.lock();
        let call = format!("update_client_scope {}", state.scope_name_of(realm, id));
        state.record(call)?;
        let stored = state
            .scopes
            .get_mut(realm)
            .and_then(|scopes| scopes.iter_mut().find(|s| s.id.as_deref() == Some(id)))
            .ok_or_else(|| not_found("Could not find client scope".to_string()))?;
        *stored = ClientScopeRepresentation {
            id: Some(id.to_string()),
            ..scope.clone()
        };
        Ok(())
    }

    async fn delete_client_scope(&self, realm: &str, id: &str) -> AdminResult<()> {
        let mut state = self.state.lock();
        let call = format!("delete_client_scope {}", state.scope_name_of(realm, id));
        state.record(call)?;
        let scopes = state.scopes.entry(realm.to_string()).or_default();
        let before = scopes.len();
        scopes.retain(|s| s.id.as_deref() != Some(id));
        if scopes.len() == before {
            return Err(not_found("Could not find client scope".to_string()));
        }
        state.mappers.remove(id);
        Ok(())
    }

    async fn protocol_mappers(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
    ) -> AdminResult<Vec<ProtocolMapperRepresentation>> {
        let mut state = self.state.lock();
        state.record(format!("protocol_mappers {owner}"))?;
        state.require_owner(realm, owner)?;
        Ok(state.mappers.get(owner.id()).cloned().unwrap_or_default())
    }

    async fn create_protocol_mapper(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
        mapper: &ProtocolMapperRepresentation,
    ) -> AdminResult<String> {
        let mut state = self.state.lock();
        state.record(format!("create_protocol_mapper {}", mapper.name))?;
        state.require_owner(realm, owner)?;
        let mappers = state.mappers.entry(owner.id().to_string()).or_default();
        if mappers.iter().any(|m| m.name == mapper.name) {
            return Err(conflict(format!(
                "Protocol mapper exists with same name: {}",
                mapper.name
            )));
        }
        // The owner identifier precedes the mapper's own in the location.
        let id = assign_id(&format!("{realm}/{owner}/protocol-mappers/models"))?;
        mappers.push(ProtocolMapperRepresentation {
            id: Some(id.clone()),
            ..mapper.clone()
        });
        Ok(id)
    }

    async fn update_protocol_mapper(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
        id: &str,
        mapper: &ProtocolMapperRepresentation,
    ) -> AdminResult<()> {
        let mut state = self.state.lock();
        let call = format!("update_protocol_mapper {}", state.mapper_name_of(owner.id(), id));
        state.record(call)?;
        state.require_owner(realm, owner)?;
        let stored = state
            .mappers
            .get_mut(owner.id())
            .and_then(|mappers| mappers.iter_mut().find(|m| m.id.as_deref() == Some(id)))
            .ok_or_else(|| not_found("Model not found".to_string()))?;
        *stored = ProtocolMapperRepresentation {
            id: Some(id.to_string()),
            ..mapper.clone()
        };
        Ok(())
    }

    async fn delete_protocol_mapper(
        &self,
        realm: &str,
        owner: MapperOwner<'_>,
        id: &str,
    ) -> AdminResult<()> {
        let mut state = self.state.lock();
        let call = format!("delete_protocol_mapper {}", state.mapper_name_of(owner.id(), id));
        state.record(call)?;
        state.require_owner(realm, owner)?;
        let mappers = state.mappers.entry(owner.id().to_string()).or_default();
        let before = mappers.len();
        mappers.retain(|m| m.id.as_deref() != Some(id));
        if mappers.len() == before {
            return Err(not_found("Model not found".to_string()));
        }
        Ok(())
    }
}

/// Connector handing out one shared [`FakeAdmin`].
pub struct FakeConnector {
    admin: Arc<FakeAdmin>,
    refused: Mutex<bool>,
}

impl FakeConnector {
    /// Creates a connector that accepts every connection.
    #[must_use]
    pub fn new(admin: Arc<FakeAdmin>) -> Arc<Self> {
        Arc::new(Self {
            admin,
            refused: Mutex::new(false),
        })
    }

    /// Makes later connection attempts fail authentication.
    pub fn refuse(&self, refused: bool) {
        *self.refused.lock() = refused;
    }
}

#[async_trait]
impl AdminConnector for FakeConnector {
    async fn connect(
        &self,
        _namespace: &str,
        spec: &KeycloakSpec,
    ) -> AdminResult<Arc<dyn AdminClient>> {
        if *self.refused.lock() {
            return Err(AdminError::Auth(format!(
                "{} rejected the credentials: 401",
                spec.url
            )));
        }
        self.admin.server_info().await?;
        let client: Arc<dyn AdminClient> = self.admin.clone();
        Ok(client)
    }
}
