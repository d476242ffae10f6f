use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::domain::models::{
    normalize_keyword, Axis, Convergence, DetectionResult, KeywordSet, PerAxis, WeightVector,
};

/// Strength multiplier for keywords listed as boost tags.
pub const BOOST_FACTOR: f64 = 1.15;

const COVER_WEIGHT: f64 = 0.6;
const DENSITY_WEIGHT: f64 = 0.4;

const SCORE_MAX_STRENGTH_WEIGHT: f64 = 0.45;
const SCORE_TRI_WEIGHT: f64 = 0.35;
const SCORE_QUAD_WEIGHT: f64 = 0.2;

/// Finds keywords shared across axes and scores the overall overlap.
///
/// Stateless; every call rebuilds its index from the inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvergenceDetector;

impl ConvergenceDetector {
    pub const fn new() -> Self {
        Self
    }

    /// Detect convergences in `keywords` under `weights`
    ///
    /// # Arguments
    /// * `keywords` - Per-axis keyword sets
    /// * `weights` - Current profile weights
    /// * `boost_tags` - Keywords that earn the boost multiplier
    /// * `boost_enabled` - Whether boost tags apply at all
    /// * `top_k` - Maximum number of convergences returned
    ///
    /// # Returns
    /// Convergences sorted by strength (ties by keyword), plus the sweet spot
    /// score computed over every qualifying keyword before truncation.
    pub fn detect(
        &self,
        keywords: &KeywordSet,
        weights: &WeightVector,
        boost_tags: &[String],
        boost_enabled: bool,
        top_k: usize,
    ) -> DetectionResult {
        let index = build_index(keywords);
        let boosts: HashSet<String> = if boost_enabled {
            boost_tags.iter().filter_map(|t| normalize_keyword(t)).collect()
        } else {
            HashSet::new()
        };

        let mut qualifying: Vec<Convergence> = index
            .into_iter()
            .filter(|(_, axes)| axes.len() >= 2)
            .map(|(keyword, axes)| {
                let boosted = boosts.contains(&keyword);
                let strength = convergence_strength(&axes, weights.values(), boosted);
                Convergence {
                    boosted_by: if boosted { vec![keyword.clone()] } else { Vec::new() },
                    keyword,
                    axes_present: axes.into_iter().collect(),
                    strength,
                    boosted,
                }
            })
            .collect();

        let score = sweet_spot_score(&qualifying);
        let total = qualifying.len();

        // Index iteration is keyword-ordered, so a stable sort keeps keyword
        // order among equal strengths.
        qualifying.sort_by(|a, b| {
            b.strength
                .total_cmp(&a.strength)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        qualifying.truncate(top_k);

        debug!(
            keywords = keywords.len(),
            qualifying = total,
            returned = qualifying.len(),
            score,
            "convergences detected"
        );

        DetectionResult {
            convergences: qualifying,
            score,
            total,
        }
    }
}

/// Keyword -> axes carrying it, keyed by normalized keyword.
fn build_index(keywords: &KeywordSet) -> BTreeMap<String, BTreeSet<Axis>> {
    let mut index: BTreeMap<String, BTreeSet<Axis>> = BTreeMap::new();
    for (axis, list) in keywords.iter() {
        for raw in list {
            if let Some(keyword) = normalize_keyword(raw) {
                index.entry(keyword).or_default().insert(axis);
            }
        }
    }
    index
}

/// Share of total weight held by `axes`; 0 when the total weight is 0.
pub fn weight_cover(axes: &BTreeSet<Axis>, weights: &PerAxis<f64>) -> f64 {
    let total = weights.sum();
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    axes.iter().map(|a| *weights.get(*a)).sum::<f64>() / total
}

/// Maps 2..=4 axes onto 0..=1.
pub fn axis_density(axis_count: usize) -> f64 {
    (axis_count.saturating_sub(1) as f64 / 3.0).clamp(0.0, 1.0)
}

/// Strength of one convergence, in `[0, 1]`.
pub fn convergence_strength(axes: &BTreeSet<Axis>, weights: &PerAxis<f64>, boosted: bool) -> f64 {
    let base = weight_cover(axes, weights)
        .mul_add(COVER_WEIGHT, axis_density(axes.len()) * DENSITY_WEIGHT)
        .clamp(0.0, 1.0);
    let boost = if boosted { BOOST_FACTOR } else { 1.0 };
    (base * boost).min(1.0)
}

/// Sweet spot score over the full qualifying set; 0 when it is empty.
pub fn sweet_spot_score(qualifying: &[Convergence]) -> f64 {
    if qualifying.is_empty() {
        return 0.0;
    }
    let union = qualifying.len() as f64;
    let tri = qualifying.iter().filter(|c| c.axes_present.len() >= 3).count() as f64;
    let quad = qualifying.iter().filter(|c| c.axes_present.len() == 4).count() as f64;
    let max_strength = qualifying
        .iter()
        .map(|c| c.strength)
        .fold(0.0_f64, f64::max);

    SCORE_QUAD_WEIGHT
        .mul_add(
            quad / union,
            SCORE_MAX_STRENGTH_WEIGHT.mul_add(max_strength, SCORE_TRI_WEIGHT * (tri / union)),
        )
        .clamp(0.0, 1.0)
}
