//! Quiz answers consumed by the profile aggregator.

use serde::{Deserialize, Serialize};

use super::axis::PerAxis;

/// Lowest accepted confidence on the 1..5 scale.
pub const MIN_CONFIDENCE: u8 = 1;

/// Highest accepted confidence on the 1..5 scale.
pub const MAX_CONFIDENCE: u8 = 5;

/// One answered quiz question.
///
/// `per_axis_score` values are expected in `[0, 1]`; missing axes count as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    #[serde(alias = "questionId")]
    pub question_id: String,

    #[serde(alias = "optionId")]
    pub option_id: String,

    #[serde(default, alias = "perAxisScore", alias = "scores")]
    pub per_axis_score: PerAxis<f64>,

    /// Self-reported confidence, 1..5
    #[serde(default = "default_confidence")]
    pub confidence: u8,
}

const fn default_confidence() -> u8 {
    3
}

impl ChoiceRecord {
    pub fn new(
        question_id: impl Into<String>,
        option_id: impl Into<String>,
        per_axis_score: PerAxis<f64>,
        confidence: u8,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            option_id: option_id.into(),
            per_axis_score,
            confidence,
        }
    }

    /// Confidence clamped into the 1..5 scale.
    pub fn clamped_confidence(&self) -> u8 {
        self.confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
    }
}
