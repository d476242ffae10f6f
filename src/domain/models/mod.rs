pub mod axis;
pub mod catalog;
pub mod choice;
pub mod config;
pub mod detection;
pub mod keywords;
pub mod offload;
pub mod preferences;
pub mod weights;

pub use axis::{Axis, PerAxis};
pub use catalog::{
    AxisTags, CatalogItem, CompatibilityResult, CostTier, RankedItem, RawCatalogItem,
    ViabilityInfo,
};
pub use choice::ChoiceRecord;
pub use config::{Config, EngineConfig, LoggingConfig, OffloadConfig, PreferencesConfig};
pub use detection::{Convergence, DetectionResult, DEFAULT_TOP_K};
pub use keywords::{normalize_keyword, KeywordSet};
pub use offload::{AggregatedProfile, ComputeMode, ComputeRequest, ComputeResponse, WorkerMessage};
pub use preferences::Preferences;
pub use weights::{WeightVector, GAP, VIAB_FLOOR};
