//! Realms.

use std::sync::Arc;

use async_trait::async_trait;
use kc_admin::dto::RealmRepresentation;
use kc_admin::{AdminClient, Connections};
use kc_model::{KeycloakRealm, KeycloakRealmSpec, ManagedResource};
use tracing::info;

use crate::diff::Diff;
use crate::error::ReconcileResult;
use crate::kinds::{connection, removal};
use crate::reconciler::{Reconciler, Removal};

/// Keeps realms in line with `KeycloakRealm` resources.
///
/// Realms are addressed by name; the admin API hands out no identifier
/// on creation.
pub struct RealmReconciler {
    connections: Connections,
}

impl RealmReconciler {
    /// Creates the reconciler.
    pub fn new(connections: Connections) -> Self {
        Self { connections }
    }
}

/// Applies the declared realm attributes.
pub fn populate(diff: &mut Diff<'_>, spec: &KeycloakRealmSpec, realm: &mut RealmRepresentation) {
    diff.field("enabled", spec.enabled.as_ref(), &mut realm.enabled);
    diff.field("displayName", spec.display_name.as_ref(), &mut realm.display_name);
    diff.field(
        "displayNameHtml",
        spec.display_name_html.as_ref(),
        &mut realm.display_name_html,
    );
    diff.field("loginTheme", spec.login_theme.as_ref(), &mut realm.login_theme);
    diff.field("accountTheme", spec.account_theme.as_ref(), &mut realm.account_theme);
    diff.field("emailTheme", spec.email_theme.as_ref(), &mut realm.email_theme);
    diff.field("sslRequired", spec.ssl_required.as_ref(), &mut realm.ssl_required);
    diff.field(
        "registrationAllowed",
        spec.registration_allowed.as_ref(),
        &mut realm.registration_allowed,
    );
    diff.field(
        "resetPasswordAllowed",
        spec.reset_password_allowed.as_ref(),
        &mut realm.reset_password_allowed,
    );
    diff.field("rememberMe", spec.remember_me.as_ref(), &mut realm.remember_me);
    diff.field("verifyEmail", spec.verify_email.as_ref(), &mut realm.verify_email);
    diff.field(
        "loginWithEmailAllowed",
        spec.login_with_email_allowed.as_ref(),
        &mut realm.login_with_email_allowed,
    );
}

#[async_trait]
impl Reconciler for RealmReconciler {
    type Resource = KeycloakRealm;
    type Parent = Arc<dyn AdminClient>;

    async fn parent(&self, resource: &KeycloakRealm) -> ReconcileResult<Arc<dyn AdminClient>> {
        connection(&self.connections, &resource.spec.keycloak)
    }

    async fn reconcile(
        &self,
        admin: &Arc<dyn AdminClient>,
        resource: &KeycloakRealm,
    ) -> ReconcileResult<()> {
        let spec = &resource.spec;
        let path = resource.path();

        match admin.realm(&spec.realm).await? {
            None => {
                let mut realm = RealmRepresentation::new(&spec.realm);
                populate(&mut Diff::create(&path), spec, &mut realm);
                admin.create_realm(&realm).await?;
                info!("{path}: created realm");
            }
            Some(mut realm) => {
                let mut diff = Diff::update(&path);
                populate(&mut diff, spec, &mut realm);
                if diff.is_changed() {
                    admin.update_realm(&spec.realm, &realm).await?;
                    info!("{path}: updated realm");
                }
            }
        }
        Ok(())
    }

    async fn remove(
        &self,
        admin: &Arc<dyn AdminClient>,
        resource: &KeycloakRealm,
    ) -> ReconcileResult<Removal> {
        let realm = &resource.spec.realm;
        if admin.realm(realm).await?.is_none() {
            return Ok(Removal::Absent);
        }
        removal(admin.delete_realm(realm).await)
    }
}
