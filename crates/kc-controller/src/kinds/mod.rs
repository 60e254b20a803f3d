//! Reconciliation strategies for the four resource kinds.

mod client;
mod client_scope;
mod keycloak;
mod realm;

use std::sync::Arc;

use kc_admin::{AdminClient, AdminResult, Connections};

use crate::error::{ReconcileError, ReconcileResult};
use crate::reconciler::Removal;

pub use client::ClientReconciler;
pub use client_scope::ClientScopeReconciler;
pub use keycloak::KeycloakReconciler;
pub use realm::RealmReconciler;

/// Parent context of clients and client scopes: a connection and a realm
/// known to exist on it.
#[derive(Clone)]
pub struct RealmContext {
    /// Admin connection.
    pub admin: Arc<dyn AdminClient>,
    /// Realm name.
    pub realm: String,
}

/// Looks up the connection registered for a Keycloak resource.
pub(crate) fn connection(
    connections: &Connections,
    keycloak: &str,
) -> ReconcileResult<Arc<dyn AdminClient>> {
    connections
        .get(keycloak)
        .ok_or_else(|| ReconcileError::not_ready(format!("keycloak {keycloak} not found")))
}

/// Resolves a connection and checks that the realm exists on it.
pub(crate) async fn realm_context(
    connections: &Connections,
    keycloak: &str,
    realm: &str,
) -> ReconcileResult<RealmContext> {
    let admin = connection(connections, keycloak)?;
    if admin.realm(realm).await?.is_none() {
        return Err(ReconcileError::not_ready(format!("realm {realm} not found")));
    }
    Ok(RealmContext {
        admin,
        realm: realm.to_string(),
    })
}

/// Treats a 404 on delete as an object that was already gone.
pub(crate) fn removal(result: AdminResult<()>) -> ReconcileResult<Removal> {
    match result {
        Ok(()) => Ok(Removal::Deleted),
        Err(e) if e.is_not_found() => Ok(Removal::Absent),
        Err(e) => Err(e.into()),
    }
}
