//! Port trait definitions (Hexagonal Architecture)
//!
//! Interfaces infrastructure adapters implement:
//! - ComputeBackend: where the pure compute function runs
//! - PreferenceStore: client-local preference persistence
//!
//! These traits keep the scoring services independent of threads,
//! channels and files.

pub mod compute_backend;
pub mod memory_preferences;
pub mod preference_store;

pub use compute_backend::ComputeBackend;
pub use memory_preferences::InMemoryPreferenceStore;
pub use preference_store::PreferenceStore;
