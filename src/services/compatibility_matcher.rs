use tracing::debug;

use crate::domain::models::weights::round_to;
use crate::domain::models::{
    Axis, CatalogItem, CompatibilityResult, CostTier, PerAxis, RankedItem, ViabilityInfo,
    WeightVector,
};

/// Contribution of each axis to the total compatibility score.
pub const AXIS_WEIGHTS: PerAxis<f64> = PerAxis::new(0.3, 0.25, 0.25, 0.2);

/// Tag count at which tag coverage saturates.
const TAG_SATURATION: f64 = 5.0;

/// Access rate assumed when the item reports none.
const DEFAULT_ACCESS_RATE: f64 = 0.5;

const ENJOYMENT_EVIDENCE_THRESHOLD: f64 = 0.7;
const ACCESS_RATE_EVIDENCE_THRESHOLD: f64 = 0.7;
const MAX_REASONS: usize = 2;
const MAX_EVIDENCES: usize = 2;

/// Similarity between an axis weight and the item's tags on that axis.
pub fn tag_similarity(axis_value: f64, tag_count: usize) -> f64 {
    if tag_count == 0 {
        return axis_value * 0.5;
    }
    let coverage = (tag_count as f64 / TAG_SATURATION).min(1.0);
    axis_value * 0.3f64.mul_add(coverage, 0.7)
}

/// Similarity between the Viability weight and the item's viability metrics.
pub fn viability_similarity(axis_value: f64, viability: Option<&ViabilityInfo>) -> f64 {
    let Some(v) = viability else {
        return axis_value * 0.5;
    };
    let access_rate = v.access_rate.unwrap_or(DEFAULT_ACCESS_RATE);
    axis_value * 0.6f64.mul_add(access_rate, 0.4 * v.cost_tier.factor())
}

/// Scores catalog items against a profile and explains the score.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityMatcher;

impl CompatibilityMatcher {
    pub const fn new() -> Self {
        Self
    }

    /// Per-axis similarity between `profile` and `item`.
    pub fn similarities(&self, profile: &WeightVector, item: &CatalogItem) -> PerAxis<f64> {
        PerAxis::from_fn(|axis| match axis {
            Axis::Viability => viability_similarity(profile.get(axis), item.viability.as_ref()),
            _ => tag_similarity(profile.get(axis), item.per_axis_tags.get(axis).len()),
        })
    }

    /// Score one item
    ///
    /// The weighted sum of per-axis similarities is multiplied by the item's
    /// confidence, rounded to two decimals and clamped to `[0, 1]`.
    pub fn score(&self, profile: &WeightVector, item: &CatalogItem) -> CompatibilityResult {
        let sims = self.similarities(profile, item);
        let weighted: f64 = sims
            .iter()
            .map(|(axis, &sim)| sim * AXIS_WEIGHTS.get(axis))
            .sum();
        let confidence = if item.confidence.is_finite() {
            item.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let score = round_to(weighted * confidence, 2).clamp(0.0, 1.0);

        CompatibilityResult {
            score,
            main_reasons: main_reasons(&sims),
            evidences: evidences(&sims, item),
        }
    }

    /// Score every item and return the best `limit`, highest score first
    ///
    /// Ties are broken by item id so the order is deterministic.
    pub fn rank(
        &self,
        profile: &WeightVector,
        items: &[CatalogItem],
        limit: Option<usize>,
    ) -> Vec<RankedItem> {
        let mut ranked: Vec<RankedItem> = items
            .iter()
            .map(|item| RankedItem {
                item_id: item.id.clone(),
                result: self.score(profile, item),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.result
                .score
                .total_cmp(&a.result.score)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }

        debug!(items = items.len(), returned = ranked.len(), "catalog ranked");
        ranked
    }
}

/// Top two axes by similarity; earlier axes win ties.
fn main_reasons(sims: &PerAxis<f64>) -> Vec<Axis> {
    let mut axes = Axis::ALL.to_vec();
    axes.sort_by(|a, b| sims.get(*b).total_cmp(sims.get(*a)));
    axes.truncate(MAX_REASONS);
    axes
}

fn evidences(sims: &PerAxis<f64>, item: &CatalogItem) -> Vec<String> {
    let mut out = Vec::new();

    let enjoyment_tags = item.per_axis_tags.get(Axis::Enjoyment);
    if sims.enjoyment > ENJOYMENT_EVIDENCE_THRESHOLD && !enjoyment_tags.is_empty() {
        out.extend(enjoyment_tags.iter().take(2).cloned());
    }

    if let Some(viability) = &item.viability {
        if viability.cost_tier == CostTier::Free {
            out.push("free".to_string());
        }
        if viability
            .access_rate
            .is_some_and(|rate| rate > ACCESS_RATE_EVIDENCE_THRESHOLD)
        {
            out.push("high access rate".to_string());
        }
    }

    out.truncate(MAX_EVIDENCES);
    out
}
