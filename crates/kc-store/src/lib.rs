//! # kc-store
//!
//! Resource store abstraction for the Keycloak controller.
//!
//! The store holds the declared resources. Controllers read them, write
//! back their status subresource and subscribe to change notifications.
//!
//! ## Contents
//!
//! - [`ResourceStore`] - list, status write and watch for one resource kind
//! - [`Watch`] / [`WatchSet`] - cancelable change subscriptions
//! - [`InMemoryStore`] - process-local implementation for tests and local runs

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod store;
pub mod watch;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use store::ResourceStore;
pub use watch::{Watch, WatchEvent, WatchHandle, WatchSet};
