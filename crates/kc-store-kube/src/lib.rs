//! # kc-store-kube
//!
//! Kubernetes implementation of the resource store, using `kube`.
//!
//! - [`KubeStore`] lists the custom resources, patches their status
//!   subresource and turns the API watch into [`kc_store::Watch`]es.
//! - [`SecretPasswordSource`] reads Keycloak admin passwords from Secrets.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod secret;
pub mod store;

pub use secret::SecretPasswordSource;
pub use store::KubeStore;
