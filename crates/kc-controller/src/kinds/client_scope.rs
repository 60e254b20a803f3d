//! Client scopes and their protocol mappers.

use async_trait::async_trait;
use kc_admin::dto::{
    CONSENT_SCREEN_TEXT, ClientScopeRepresentation, DISPLAY_ON_CONSENT_SCREEN, GUI_ORDER,
    INCLUDE_IN_TOKEN_SCOPE,
};
use kc_admin::{AdminError, Connections, MapperOwner};
use kc_model::{KeycloakClientScope, KeycloakClientScopeSpec, ManagedResource, OPENID_CONNECT};
use tracing::info;

use crate::diff::{Diff, bool_string};
use crate::error::ReconcileResult;
use crate::kinds::{RealmContext, realm_context, removal};
use crate::mappers::sync_mappers;
use crate::reconciler::{Reconciler, Removal};

/// Keeps client scopes in line with `KeycloakClientScope` resources.
pub struct ClientScopeReconciler {
    connections: Connections,
}

impl ClientScopeReconciler {
    /// Creates the reconciler.
    pub fn new(connections: Connections) -> Self {
        Self { connections }
    }
}

/// Applies the declared scope attributes. Scope settings live in the
/// string-valued attribute map.
pub fn populate(
    diff: &mut Diff<'_>,
    spec: &KeycloakClientScopeSpec,
    scope: &mut ClientScopeRepresentation,
) {
    diff.field("description", spec.description.as_ref(), &mut scope.description);
    diff.field("protocol", spec.protocol.as_ref(), &mut scope.protocol);
    diff.attribute(
        "includeInTokenScope",
        INCLUDE_IN_TOKEN_SCOPE,
        bool_string(spec.include_in_token_scope),
        &mut scope.attributes,
    );
    diff.attribute(
        "displayOnConsentScreen",
        DISPLAY_ON_CONSENT_SCREEN,
        bool_string(spec.display_on_consent_screen),
        &mut scope.attributes,
    );
    diff.attribute(
        "consentScreenText",
        CONSENT_SCREEN_TEXT,
        spec.consent_screen_text.clone(),
        &mut scope.attributes,
    );
    diff.attribute(
        "guiOrder",
        GUI_ORDER,
        spec.gui_order.map(|order| order.to_string()),
        &mut scope.attributes,
    );
}

#[async_trait]
impl Reconciler for ClientScopeReconciler {
    type Resource = KeycloakClientScope;
    type Parent = RealmContext;

    async fn parent(&self, resource: &KeycloakClientScope) -> ReconcileResult<RealmContext> {
        realm_context(&self.connections, &resource.spec.keycloak, &resource.spec.realm).await
    }

    async fn reconcile(
        &self,
        parent: &RealmContext,
        resource: &KeycloakClientScope,
    ) -> ReconcileResult<()> {
        let RealmContext { admin, realm } = parent;
        let spec = &resource.spec;
        let path = resource.path();

        let existing = admin
            .client_scopes(realm)
            .await?
            .into_iter()
            .find(|s| s.name == spec.name);

        let id = match existing {
            None => {
                let mut scope = ClientScopeRepresentation::new(&spec.name);
                scope.protocol = Some(OPENID_CONNECT.to_string());
                populate(&mut Diff::create(&path), spec, &mut scope);
                let id = admin.create_client_scope(realm, &scope).await?;
                info!("{path}: created client scope");
                id
            }
            Some(mut scope) => {
                let id = scope.id.clone().ok_or_else(|| {
                    AdminError::protocol(format!("{path}: client scope was listed without id"))
                })?;
                let mut diff = Diff::update(&path);
                populate(&mut diff, spec, &mut scope);
                if diff.is_changed() {
                    admin.update_client_scope(realm, &id, &scope).await?;
                    info!("{path}: updated client scope");
                }
                id
            }
        };

        sync_mappers(
            &**admin,
            realm,
            MapperOwner::ClientScope(&id),
            &spec.mappers,
            &path,
        )
        .await?;
        Ok(())
    }

    async fn remove(
        &self,
        parent: &RealmContext,
        resource: &KeycloakClientScope,
    ) -> ReconcileResult<Removal> {
        let RealmContext { admin, realm } = parent;
        let existing = admin
            .client_scopes(realm)
            .await?
            .into_iter()
            .find(|s| s.name == resource.spec.name);

        match existing.and_then(|s| s.id) {
            Some(id) => removal(admin.delete_client_scope(realm, &id).await),
            None => Ok(Removal::Absent),
        }
    }
}
