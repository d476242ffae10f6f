//! Catalog items as seen by the compatibility matcher.
//!
//! Upstream data arrives in several shapes (camelCase and snake_case field
//! names, French axis names, viability fields nested or flattened). All of
//! them deserialize through [`RawCatalogItem`], which is normalized once into
//! the canonical [`CatalogItem`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::axis::{Axis, PerAxis};

/// Price bracket of a training program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    #[serde(alias = "gratuit")]
    Free,
    #[serde(alias = "modere", alias = "modéré")]
    Moderate,
    #[serde(alias = "eleve", alias = "élevé")]
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CostTier {
    /// Multiplier applied to the viability similarity.
    pub const fn factor(self) -> f64 {
        match self {
            Self::Free => 1.0,
            Self::Moderate => 0.7,
            Self::High => 0.4,
            Self::Unknown => 0.6,
        }
    }
}

impl fmt::Display for CostTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Free => "free",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Viability metrics attached to a catalog item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViabilityInfo {
    /// Share of applicants admitted, in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_rate: Option<f64>,

    #[serde(default)]
    pub cost_tier: CostTier,
}

/// Tags on the three tag-bearing axes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisTags {
    #[serde(default)]
    pub enjoyment: Vec<String>,
    #[serde(default)]
    pub competence: Vec<String>,
    #[serde(default)]
    pub utility: Vec<String>,
}

impl AxisTags {
    /// Tags for `axis`; Viability never carries tags.
    pub fn get(&self, axis: Axis) -> &[String] {
        match axis {
            Axis::Enjoyment => &self.enjoyment,
            Axis::Competence => &self.competence,
            Axis::Utility => &self.utility,
            Axis::Viability => &[],
        }
    }
}

/// Canonical catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCatalogItem")]
pub struct CatalogItem {
    pub id: String,
    pub per_axis_tags: AxisTags,
    pub viability: Option<ViabilityInfo>,
    /// Data quality of the item, in `[0, 1]`
    pub confidence: f64,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            per_axis_tags: AxisTags::default(),
            viability: None,
            confidence: 1.0,
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, axis: Axis, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = clean_tags(tags.into_iter().map(Into::into));
        match axis {
            Axis::Enjoyment => self.per_axis_tags.enjoyment = tags,
            Axis::Competence => self.per_axis_tags.competence = tags,
            Axis::Utility => self.per_axis_tags.utility = tags,
            Axis::Viability => {}
        }
        self
    }

    #[must_use]
    pub fn with_viability(mut self, access_rate: Option<f64>, cost_tier: CostTier) -> Self {
        self.viability = Some(ViabilityInfo {
            access_rate: access_rate.and_then(coerce_unit),
            cost_tier,
        });
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = coerce_unit(confidence).unwrap_or(0.0);
        self
    }
}

/// Viability block as found upstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawViability {
    #[serde(default, alias = "accessRate", alias = "taux_acces")]
    pub access_rate: Option<f64>,

    #[serde(default, alias = "costTier", alias = "cost")]
    pub cost_tier: Option<CostTier>,
}

/// Any accepted upstream shape of a catalog item.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCatalogItem {
    pub id: String,

    #[serde(default, alias = "perAxisTags", alias = "tags_by_axis", alias = "axis_tags")]
    pub per_axis_tags: PerAxis<Vec<String>>,

    #[serde(default)]
    pub viability: Option<RawViability>,

    /// Flattened variant of `viability.access_rate`
    #[serde(default, alias = "accessRate", alias = "taux_acces")]
    pub access_rate: Option<f64>,

    /// Flattened variant of `viability.cost_tier`
    #[serde(default, alias = "costTier", alias = "cost")]
    pub cost_tier: Option<CostTier>,

    #[serde(default)]
    pub confidence: Option<f64>,
}

impl From<RawCatalogItem> for CatalogItem {
    fn from(raw: RawCatalogItem) -> Self {
        let nested = raw.viability.unwrap_or_default();
        let access_rate = nested.access_rate.or(raw.access_rate).and_then(coerce_unit);
        let cost_tier = nested.cost_tier.or(raw.cost_tier);

        let viability = if access_rate.is_some() || cost_tier.is_some() {
            Some(ViabilityInfo {
                access_rate,
                cost_tier: cost_tier.unwrap_or_default(),
            })
        } else {
            None
        };

        let tags = raw.per_axis_tags;
        Self {
            id: raw.id,
            per_axis_tags: AxisTags {
                enjoyment: clean_tags(tags.enjoyment),
                competence: clean_tags(tags.competence),
                utility: clean_tags(tags.utility),
            },
            viability,
            confidence: raw
                .confidence
                .map_or(1.0, |c| coerce_unit(c).unwrap_or(0.0)),
        }
    }
}

/// Clamp a finite number into `[0, 1]`; non-finite input yields `None`.
fn coerce_unit(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

fn clean_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Outcome of scoring one catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    /// Compatibility in `[0, 1]`, two decimals
    pub score: f64,

    /// At most two axes, strongest first
    pub main_reasons: Vec<Axis>,

    /// At most two short evidence strings, display order
    pub evidences: Vec<String>,
}

/// A compatibility result joined with the item it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub item_id: String,
    pub result: CompatibilityResult,
}
