//! Infrastructure layer module
//!
//! This module contains the adapters around the scoring core:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - Preference persistence (JSON files)
//! - Stdio hosting of the offload worker
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod preferences;
pub mod worker;
