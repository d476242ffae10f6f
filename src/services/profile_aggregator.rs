use tracing::debug;

use crate::domain::models::choice::{ChoiceRecord, MAX_CONFIDENCE};
use crate::domain::models::weights::{
    enforce_global_constraints, finalize, round_to, sanitize_axis_value, AGGREGATE_DECIMALS,
};
use crate::domain::models::{AggregatedProfile, Axis, PerAxis, WeightVector};

/// Folds quiz answers into a weight vector.
///
/// Axis values are confidence-weighted means; `confidence_avg` is the plain
/// mean of raw confidences. The asymmetry is a product decision.
#[derive(Debug, Clone)]
pub struct ProfileAggregator {
    min_choice_weight: f64,
}

impl Default for ProfileAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileAggregator {
    /// Create an aggregator with the default minimum choice weight (0.2)
    pub const fn new() -> Self {
        Self {
            min_choice_weight: 0.2,
        }
    }

    /// Weight of a single answer: `clamp(confidence / 5, 0.2, 1.0)`
    pub fn choice_weight(&self, choice: &ChoiceRecord) -> f64 {
        (f64::from(choice.confidence) / f64::from(MAX_CONFIDENCE)).clamp(self.min_choice_weight, 1.0)
    }

    /// Aggregate answers into a constrained profile
    ///
    /// # Arguments
    /// * `choices` - Answered questions, in any order
    ///
    /// # Returns
    /// The weight vector (two decimals) and the raw confidence mean. An empty
    /// list yields the neutral vector and a confidence mean of 0.
    pub fn aggregate(&self, choices: &[ChoiceRecord]) -> AggregatedProfile {
        if choices.is_empty() {
            return AggregatedProfile {
                weights: WeightVector::default(),
                confidence_avg: 0.0,
            };
        }

        let mut weighted = PerAxis::<f64>::default();
        let mut weight_sum = 0.0;
        for choice in choices {
            let w = self.choice_weight(choice);
            weight_sum += w;
            for axis in Axis::ALL {
                let score = *choice.per_axis_score.get(axis);
                let score = if score.is_finite() { score.clamp(0.0, 1.0) } else { 0.0 };
                *weighted.get_mut(axis) += score * w;
            }
        }

        // weight_sum >= 0.2 per choice, never zero here
        let means = weighted.map(|axis, &total| sanitize_axis_value(axis, total / weight_sum));
        let constrained = enforce_global_constraints(means.clone());
        let values = finalize(constrained, AGGREGATE_DECIMALS);

        let confidence_avg = choices
            .iter()
            .map(|c| f64::from(c.clamped_confidence()))
            .sum::<f64>()
            / choices.len() as f64;
        let confidence_avg = round_to(confidence_avg, AGGREGATE_DECIMALS);

        debug!(
            choices = choices.len(),
            raw_spread = means.spread(),
            spread = values.spread(),
            confidence_avg,
            "profile aggregated"
        );

        AggregatedProfile {
            weights: WeightVector::from_constrained(values),
            confidence_avg,
        }
    }
}
