//! # Gateway Module
//!
//! HTTP-to-SQL translation: table-agnostic REST routes and a raw-query
//! endpoint, both behind a shared-secret gate, turned into parameterized
//! statements for the configured database capability.

pub mod auth;
pub mod builder;
pub mod config;
pub mod errors;
pub mod params;
pub mod sanitize;
pub mod selector;
pub mod server;

pub use config::GatewayConfig;
pub use errors::{GatewayError, GatewayResult};
pub use params::RestQuery;
pub use selector::DatabaseBindings;
pub use server::{GatewayServer, GatewayState};
