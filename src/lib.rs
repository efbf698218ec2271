//! sqlgate - a table-agnostic HTTP-to-SQL gateway
//!
//! Translates REST requests and raw queries into parameterized SQL against a
//! configured database capability, behind a shared-secret gate.

pub mod database;
pub mod gateway;
