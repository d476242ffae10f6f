//! Domain layer for the Sweetspot engine
//!
//! Core data model and the port traits infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
