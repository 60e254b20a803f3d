//! # kc-core
//!
//! Core configuration and error handling for the Keycloak controller.
//!
//! This crate provides the foundational types shared by the store, admin
//! client, controller and operator crates.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;

pub use config::OperatorConfig;
pub use error::{Error, Result};
