//! # kc-controller
//!
//! Reconciliation engine keeping Keycloak realms, clients, client scopes
//! and their protocol mappers in line with declared resources.
//!
//! ## Modules
//!
//! - [`diff`] - Attribute change detection
//! - [`sync`] - Name-keyed set reconciliation
//! - [`mappers`] - Protocol mapper synchronization
//! - [`status`] - Status write suppression and retry selection
//! - [`outcome`] - [`ReconciliationOutcome`]
//! - [`reconciler`] - The [`Reconciler`] strategy trait and the generic [`Controller`]
//! - [`kinds`] - Strategies for Keycloak, realms, clients and client scopes
//! - [`supervisor`] - Watch dispatch and the periodic retry sweep

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod diff;
pub mod error;
pub mod kinds;
pub mod mappers;
pub mod outcome;
pub mod reconciler;
pub mod status;
pub mod supervisor;
pub mod sync;

pub use error::{ReconcileError, ReconcileResult};
pub use kinds::{
    ClientReconciler, ClientScopeReconciler, KeycloakReconciler, RealmContext, RealmReconciler,
};
pub use outcome::ReconciliationOutcome;
pub use reconciler::{Controller, Reconciler, Removal};
pub use status::{needs_retry, needs_status_write};
pub use supervisor::{ManagedController, Supervisor};
