//! Output types of the convergence detector.

use serde::{Deserialize, Serialize};

use super::axis::Axis;

/// Default number of convergences returned by a detection.
pub const DEFAULT_TOP_K: usize = 20;

/// A keyword that recurs on two or more axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    pub keyword: String,

    /// Axes carrying the keyword, in enumeration order (2..=4 entries)
    pub axes_present: Vec<Axis>,

    /// Strength in `[0, 1]`
    pub strength: f64,

    pub boosted: bool,

    /// Boost tags that matched this keyword
    #[serde(default)]
    pub boosted_by: Vec<String>,
}

/// Ranked convergences plus the sweet spot score over the whole keyword set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Top convergences, strongest first
    pub convergences: Vec<Convergence>,

    /// Sweet spot score in `[0, 1]`, computed before truncation
    pub score: f64,

    /// Number of qualifying keywords before truncation
    pub total: usize,
}
