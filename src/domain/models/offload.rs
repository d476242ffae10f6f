//! Payloads and messages exchanged with the background compute worker.

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogItem, RankedItem};
use super::choice::ChoiceRecord;
use super::detection::{DetectionResult, DEFAULT_TOP_K};
use super::keywords::KeywordSet;
use super::weights::WeightVector;

/// What a compute request should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeMode {
    /// Convergence detection and sweet spot score only
    #[default]
    Convergences,
    /// Also aggregate `choices` and rank `catalog` when present
    Full,
}

/// Input snapshot for one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequest {
    #[serde(default)]
    pub weights: WeightVector,

    #[serde(default, alias = "keywordSet", alias = "tags")]
    pub keyword_set: KeywordSet,

    #[serde(default, alias = "boostTags")]
    pub boost_tags: Vec<String>,

    #[serde(default = "default_true", alias = "boostEnabled")]
    pub boost_enabled: bool,

    #[serde(default = "default_top_k", alias = "topK")]
    pub top_k: usize,

    #[serde(default)]
    pub mode: ComputeMode,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<CatalogItem>,

    /// Maximum number of ranked catalog items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

const fn default_true() -> bool {
    true
}

const fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl ComputeRequest {
    /// Convergence-only request with default options.
    pub fn new(weights: WeightVector, keyword_set: KeywordSet) -> Self {
        Self {
            weights,
            keyword_set,
            boost_tags: Vec::new(),
            boost_enabled: true,
            top_k: DEFAULT_TOP_K,
            mode: ComputeMode::Convergences,
            choices: Vec::new(),
            catalog: Vec::new(),
            limit: None,
        }
    }

    #[must_use]
    pub fn with_boost(mut self, tags: Vec<String>, enabled: bool) -> Self {
        self.boost_tags = tags;
        self.boost_enabled = enabled;
        self
    }
}

/// Aggregated quiz profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedProfile {
    pub weights: WeightVector,

    /// Unweighted mean of raw confidences on the 1..5 scale, two decimals
    pub confidence_avg: f64,
}

/// Output of one computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeResponse {
    pub detection: DetectionResult,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<AggregatedProfile>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranking: Vec<RankedItem>,
}

/// Messages on the worker channel, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerMessage {
    /// Readiness probe
    Ping,
    /// Readiness answer
    Pong,
    /// Request a computation; `seq` increases monotonically per client
    Compute { seq: u64, payload: ComputeRequest },
    /// Answer to the `Compute` with the same `seq`
    Result { seq: u64, payload: ComputeResponse },
}

impl WorkerMessage {
    /// Short name used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::Compute { .. } => "compute",
            Self::Result { .. } => "result",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Axis;

    #[test]
    fn test_message_wire_format() {
        assert_eq!(serde_json::to_string(&WorkerMessage::Ping).unwrap(), r#"{"type":"ping"}"#);
        let pong: WorkerMessage = serde_json::from_str(r#"{"type":"pong"}"#).unwrap();
        assert_eq!(pong, WorkerMessage::Pong);
    }

    #[test]
    fn test_compute_accepts_camel_case_payload() {
        let msg: WorkerMessage = serde_json::from_str(
            r#"{"type":"compute","seq":7,"payload":{
                "weights":{"enjoyment":0.5,"competence":0.5,"utility":0.5,"viability":0.5},
                "keywordSet":{"passions":["Design"]},
                "boostTags":["design"],"mode":"full"}}"#,
        )
        .unwrap();
        let WorkerMessage::Compute { seq, payload } = msg else {
            panic!("expected compute message");
        };
        assert_eq!(seq, 7);
        assert_eq!(payload.mode, ComputeMode::Full);
        assert!(payload.boost_enabled);
        assert_eq!(payload.top_k, DEFAULT_TOP_K);
        assert_eq!(payload.keyword_set.get(Axis::Enjoyment), ["design".to_string()]);
    }

    #[test]
    fn test_unknown_message_type_is_rejected() {
        assert!(serde_json::from_str::<WorkerMessage>(r#"{"type":"error"}"#).is_err());
    }
}
