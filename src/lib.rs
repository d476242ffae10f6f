//! Sweetspot - profile scoring and convergence engine
//!
//! Sweetspot weighs a user's profile across four axes (enjoyment, competence,
//! utility, viability), finds keywords that recur across those axes, and
//! ranks catalog items against the profile with short explanations.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, invariants and port traits
//! - **Service Layer** (`services`): Solver, aggregator, detector, matcher and the offload worker
//! - **Infrastructure Layer** (`infrastructure`): Configuration, logging, preference files, stdio worker
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```
//! use sweetspot::domain::models::{Axis, KeywordSet, WeightVector};
//! use sweetspot::services::{AxisConstraintSolver, ConvergenceDetector};
//!
//! let outcome = AxisConstraintSolver::new().set_axis(&WeightVector::default(), Axis::Utility, 0.8);
//! let keywords = KeywordSet::new()
//!     .with_axis(Axis::Enjoyment, ["design"])
//!     .with_axis(Axis::Utility, ["design"]);
//! let result = ConvergenceDetector::new().detect(&keywords, &outcome.weights, &[], true, 20);
//! assert_eq!(result.convergences[0].keyword, "design");
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Axis, CatalogItem, ChoiceRecord, ComputeRequest, ComputeResponse, Config, KeywordSet,
    WeightVector, GAP, VIAB_FLOOR,
};
pub use domain::ports::{ComputeBackend, PreferenceStore};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    compute, AxisConstraintSolver, CompatibilityMatcher, ConvergenceDetector, ProfileAggregator,
};
