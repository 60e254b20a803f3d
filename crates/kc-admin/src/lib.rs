//! # kc-admin
//!
//! Client side of the Keycloak admin REST API.
//!
//! ## Modules
//!
//! - [`api`] - The [`AdminClient`] capability the controllers program against
//! - [`connection`] - Connectors and the per-instance connection registry
//! - [`dto`] - Admin API representations
//! - [`error`] - Error types
//! - [`http`] - reqwest implementation with token handling
//! - [`location`] - Identifier extraction from `Location` headers

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod api;
pub mod connection;
pub mod dto;
pub mod error;
pub mod http;
pub mod location;

pub use api::{AdminClient, MapperOwner};
pub use connection::{AdminConnector, Connections, HttpConnector, PasswordSource, StaticPassword};
pub use error::{AdminError, AdminResult};
pub use http::{Credentials, HttpAdminClient};
