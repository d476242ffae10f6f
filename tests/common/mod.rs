//! Common test utilities for integration tests
//!
//! Shared fixtures for keyword sets, choices and catalogs used across
//! multiple integration test files.

use sweetspot::domain::models::{
    Axis, CatalogItem, ChoiceRecord, ComputeMode, ComputeRequest, CostTier, KeywordSet, PerAxis,
    WeightVector,
};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Keyword set with one four-axis, one three-axis and one two-axis convergence.
#[allow(dead_code)]
pub fn sample_keywords() -> KeywordSet {
    KeywordSet::new()
        .with_axis(Axis::Enjoyment, ["Design", "musique", "jeux video", "ia"])
        .with_axis(Axis::Competence, ["design", "Musique", "code"])
        .with_axis(Axis::Utility, ["design", "education", "code"])
        .with_axis(Axis::Viability, ["design", "freelance"])
}

#[allow(dead_code)]
pub fn sample_choices() -> Vec<ChoiceRecord> {
    vec![
        ChoiceRecord::new("q1", "a", PerAxis::new(0.9, 0.6, 0.4, 0.3), 5),
        ChoiceRecord::new("q2", "c", PerAxis::new(0.7, 0.8, 0.5, 0.5), 3),
        ChoiceRecord::new("q3", "b", PerAxis::new(0.6, 0.4, 0.9, 0.4), 1),
    ]
}

#[allow(dead_code)]
pub fn sample_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("bts-design")
            .with_tags(Axis::Enjoyment, ["design", "ui"])
            .with_confidence(0.9),
        CatalogItem::new("licence-musique")
            .with_tags(Axis::Enjoyment, ["musique", "son", "scene", "composition", "live"])
            .with_tags(Axis::Competence, ["solfege"])
            .with_viability(Some(0.4), CostTier::Moderate),
        CatalogItem::new("mooc-code")
            .with_tags(Axis::Competence, ["code", "python"])
            .with_tags(Axis::Utility, ["numerique"])
            .with_viability(Some(0.9), CostTier::Free),
    ]
}

/// Full-mode request exercising aggregation, detection and ranking at once.
#[allow(dead_code)]
pub fn full_request() -> ComputeRequest {
    let mut request = ComputeRequest::new(WeightVector::default(), sample_keywords())
        .with_boost(vec!["design".to_string()], true);
    request.mode = ComputeMode::Full;
    request.choices = sample_choices();
    request.catalog = sample_catalog();
    request.limit = Some(2);
    request
}
