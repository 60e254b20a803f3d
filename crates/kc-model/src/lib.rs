//! # kc-model
//!
//! Managed resource shapes for the Keycloak controller.
//!
//! Every kind is a namespaced custom resource in the `k8s.kiwigrid.com`
//! group with a typed spec and the shared [`ResourceStatus`] subresource.
//!
//! - [`Keycloak`] - an admin connection to a Keycloak instance
//! - [`KeycloakRealm`] - a realm inside an instance
//! - [`KeycloakClient`] - an OAuth client inside a realm
//! - [`KeycloakClientScope`] - a client scope inside a realm

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod client_scope;
pub mod keycloak;
pub mod mapper;
pub mod realm;
pub mod resource;
pub mod status;

pub use client::{KeycloakClient, KeycloakClientSpec};
pub use client_scope::{KeycloakClientScope, KeycloakClientScopeSpec};
pub use keycloak::{Keycloak, KeycloakSpec};
pub use mapper::MapperSpec;
pub use realm::{KeycloakRealm, KeycloakRealmSpec};
pub use resource::{ManagedResource, ResourceKey};
pub use status::ResourceStatus;

/// API group shared by all resource kinds.
pub const API_GROUP: &str = "k8s.kiwigrid.com";

/// Name of the Keycloak instance used when a spec does not name one.
pub const DEFAULT_KEYCLOAK: &str = "default";

/// Protocol assumed for scopes and mappers when none is declared.
pub const OPENID_CONNECT: &str = "openid-connect";

pub(crate) fn default_keycloak() -> String {
    DEFAULT_KEYCLOAK.to_string()
}
