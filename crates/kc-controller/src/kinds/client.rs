//! OAuth clients and their protocol mappers.

use async_trait::async_trait;
use kc_admin::dto::ClientRepresentation;
use kc_admin::{AdminError, Connections, MapperOwner};
use kc_model::{KeycloakClient, KeycloakClientSpec, ManagedResource, OPENID_CONNECT};
use tracing::info;

use crate::diff::Diff;
use crate::error::ReconcileResult;
use crate::kinds::{RealmContext, realm_context, removal};
use crate::mappers::sync_mappers;
use crate::reconciler::{Reconciler, Removal};

/// Keeps clients in line with `KeycloakClient` resources.
pub struct ClientReconciler {
    connections: Connections,
}

impl ClientReconciler {
    /// Creates the reconciler.
    pub fn new(connections: Connections) -> Self {
        Self { connections }
    }
}

/// Applies the declared client attributes.
pub fn populate(diff: &mut Diff<'_>, spec: &KeycloakClientSpec, client: &mut ClientRepresentation) {
    diff.field("name", spec.name.as_ref(), &mut client.name);
    diff.field("description", spec.description.as_ref(), &mut client.description);
    diff.field("enabled", spec.enabled.as_ref(), &mut client.enabled);
    diff.field("publicClient", spec.public_client.as_ref(), &mut client.public_client);
    diff.field("bearerOnly", spec.bearer_only.as_ref(), &mut client.bearer_only);
    diff.field(
        "standardFlowEnabled",
        spec.standard_flow_enabled.as_ref(),
        &mut client.standard_flow_enabled,
    );
    diff.field(
        "implicitFlowEnabled",
        spec.implicit_flow_enabled.as_ref(),
        &mut client.implicit_flow_enabled,
    );
    diff.field(
        "directAccessGrantsEnabled",
        spec.direct_access_grants_enabled.as_ref(),
        &mut client.direct_access_grants_enabled,
    );
    diff.field(
        "serviceAccountsEnabled",
        spec.service_accounts_enabled.as_ref(),
        &mut client.service_accounts_enabled,
    );
    diff.field(
        "consentRequired",
        spec.consent_required.as_ref(),
        &mut client.consent_required,
    );
    diff.field("rootUrl", spec.root_url.as_ref(), &mut client.root_url);
    diff.field("baseUrl", spec.base_url.as_ref(), &mut client.base_url);
    diff.field("adminUrl", spec.admin_url.as_ref(), &mut client.admin_url);
    diff.set_field("redirectUris", spec.redirect_uris.as_ref(), &mut client.redirect_uris);
    diff.set_field("webOrigins", spec.web_origins.as_ref(), &mut client.web_origins);
}

#[async_trait]
impl Reconciler for ClientReconciler {
    type Resource = KeycloakClient;
    type Parent = RealmContext;

    async fn parent(&self, resource: &KeycloakClient) -> ReconcileResult<RealmContext> {
        realm_context(&self.connections, &resource.spec.keycloak, &resource.spec.realm).await
    }

    async fn reconcile(
        &self,
        parent: &RealmContext,
        resource: &KeycloakClient,
    ) -> ReconcileResult<()> {
        let RealmContext { admin, realm } = parent;
        let spec = &resource.spec;
        let path = resource.path();

        let existing = admin
            .clients(realm)
            .await?
            .into_iter()
            .find(|c| c.client_id == spec.client_id);

        let id = match existing {
            None => {
                let mut client = ClientRepresentation::new(&spec.client_id);
                client.protocol = Some(OPENID_CONNECT.to_string());
                populate(&mut Diff::create(&path), spec, &mut client);
                let id = admin.create_client(realm, &client).await?;
                info!("{path}: created client");
                id
            }
            Some(mut client) => {
                let id = client.id.clone().ok_or_else(|| {
                    AdminError::protocol(format!("{path}: client was listed without id"))
                })?;
                let mut diff = Diff::update(&path);
                populate(&mut diff, spec, &mut client);
                if diff.is_changed() {
                    admin.update_client(realm, &id, &client).await?;
                    info!("{path}: updated client");
                }
                id
            }
        };

        sync_mappers(
            &**admin,
            realm,
            MapperOwner::Client(&id),
            &spec.mappers,
            &path,
        )
        .await?;
        Ok(())
    }

    async fn remove(
        &self,
        parent: &RealmContext,
        resource: &KeycloakClient,
    ) -> ReconcileResult<Removal> {
        let RealmContext { admin, realm } = parent;
        let existing = admin
            .clients(realm)
            .await?
            .into_iter()
            .find(|c| c.client_id == resource.spec.client_id);

        match existing.and_then(|c| c.id) {
            Some(id) => removal(admin.delete_client(realm, &id).await),
            None => Ok(Removal::Absent),
        }
    }
}
