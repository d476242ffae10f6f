//! The single pure entry point shared by every execution path.
//!
//! Both the synchronous fallback and the background worker call
//! [`compute`]; neither re-implements any formula.

use async_trait::async_trait;

use crate::domain::models::{ComputeMode, ComputeRequest, ComputeResponse};
use crate::domain::ports::ComputeBackend;
use crate::services::{CompatibilityMatcher, ConvergenceDetector, ProfileAggregator};

/// Run detection (and, in full mode, aggregation and ranking) for `request`.
///
/// In full mode with choices present, the aggregated weights replace the
/// request weights for detection and ranking.
pub fn compute(request: &ComputeRequest) -> ComputeResponse {
    let profile = match request.mode {
        ComputeMode::Full if !request.choices.is_empty() => {
            Some(ProfileAggregator::new().aggregate(&request.choices))
        }
        _ => None,
    };
    let weights = profile.as_ref().map_or(&request.weights, |p| &p.weights);

    let detection = ConvergenceDetector::new().detect(
        &request.keyword_set,
        weights,
        &request.boost_tags,
        request.boost_enabled,
        request.top_k,
    );

    let ranking = match request.mode {
        ComputeMode::Full => {
            CompatibilityMatcher::new().rank(weights, &request.catalog, request.limit)
        }
        ComputeMode::Convergences => Vec::new(),
    };

    ComputeResponse {
        detection,
        profile,
        ranking,
    }
}

/// Runs [`compute`] inline on the caller's task.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncBackend;

impl SyncBackend {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ComputeBackend for SyncBackend {
    async fn compute(&self, request: ComputeRequest) -> Option<ComputeResponse> {
        Some(compute(&request))
    }

    fn name(&self) -> &'static str {
        "sync"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        Axis, CatalogItem, ChoiceRecord, KeywordSet, PerAxis, WeightVector,
    };

    fn keywords() -> KeywordSet {
        KeywordSet::new()
            .with_axis(Axis::Enjoyment, ["design", "music"])
            .with_axis(Axis::Competence, ["design"])
            .with_axis(Axis::Utility, ["music"])
    }

    #[test]
    fn test_convergence_mode_skips_ranking() {
        let mut request = ComputeRequest::new(WeightVector::default(), keywords());
        request.catalog = vec![CatalogItem::new("x")];
        let response = compute(&request);
        assert_eq!(response.detection.total, 2);
        assert!(response.ranking.is_empty());
        assert!(response.profile.is_none());
    }

    #[test]
    fn test_full_mode_uses_aggregated_weights() {
        let mut request = ComputeRequest::new(WeightVector::default(), keywords());
        request.mode = ComputeMode::Full;
        request.choices = vec![ChoiceRecord::new("q1", "a", PerAxis::new(0.9, 0.5, 0.5, 0.5), 5)];
        request.catalog = vec![CatalogItem::new("x"), CatalogItem::new("y")];
        request.limit = Some(1);

        let response = compute(&request);
        let profile = response.profile.expect("profile aggregated");
        assert_eq!(profile.weights.get(Axis::Enjoyment), 0.9);
        assert_eq!(response.ranking.len(), 1);

        let expected = ConvergenceDetector::new().detect(
            &request.keyword_set,
            &profile.weights,
            &[],
            true,
            request.top_k,
        );
        assert_eq!(response.detection, expected);
    }

    #[tokio::test]
    async fn test_sync_backend_matches_pure_function() {
        let request = ComputeRequest::new(WeightVector::default(), keywords());
        let backend = SyncBackend::new();
        assert_eq!(backend.compute(request.clone()).await, Some(compute(&request)));
        assert_eq!(backend.name(), "sync");
    }
}
