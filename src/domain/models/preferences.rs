//! Client-local preferences persisted between sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::axis::Axis;
use super::weights::WeightVector;

/// Slider values, boost toggle and dimension filters of one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Re-validated on load through [`WeightVector`]'s deserializer
    pub weights: WeightVector,

    pub boost_enabled: bool,

    /// Axes whose keywords take part in detection
    pub active_dimensions: Vec<Axis>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            weights: WeightVector::default(),
            boost_enabled: true,
            active_dimensions: Axis::ALL.to_vec(),
            saved_at: None,
        }
    }
}

impl Preferences {
    /// Active dimensions, deduplicated and in enumeration order.
    pub fn normalized_dimensions(&self) -> Vec<Axis> {
        let mut dims = self.active_dimensions.clone();
        dims.sort();
        dims.dedup();
        dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_payload_fills_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"boost_enabled":false}"#).unwrap();
        assert!(!prefs.boost_enabled);
        assert_eq!(prefs.weights, WeightVector::default());
        assert_eq!(prefs.active_dimensions, Axis::ALL.to_vec());
    }

    #[test]
    fn test_normalized_dimensions() {
        let prefs = Preferences {
            active_dimensions: vec![Axis::Viability, Axis::Enjoyment, Axis::Viability],
            ..Default::default()
        };
        assert_eq!(prefs.normalized_dimensions(), vec![Axis::Enjoyment, Axis::Viability]);
    }
}
