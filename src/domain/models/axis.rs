//! The four profile axes and a fixed-shape container keyed by them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// One of the four canonical profile dimensions.
///
/// The declaration order is the enumeration order used for every
/// deterministic tie-break in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// What the student likes doing.
    #[serde(alias = "passions")]
    Enjoyment,
    /// What the student is good at.
    #[serde(alias = "talents")]
    Competence,
    /// What the student considers useful to the world.
    #[serde(alias = "utilite")]
    Utility,
    /// Whether the path is economically and practically reachable.
    #[serde(alias = "viabilite")]
    Viability,
}

impl Axis {
    /// All axes in enumeration order.
    pub const ALL: [Self; 4] = [
        Self::Enjoyment,
        Self::Competence,
        Self::Utility,
        Self::Viability,
    ];

    /// Axes that carry catalog tags (Viability is scored from metrics instead).
    pub const TAGGED: [Self; 3] = [Self::Enjoyment, Self::Competence, Self::Utility];

    /// Lowest value this axis may take in a weight vector.
    pub const fn floor(self) -> f64 {
        match self {
            Self::Viability => super::weights::VIAB_FLOOR,
            _ => 0.0,
        }
    }

    /// Canonical lower-case wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enjoyment => "enjoyment",
            Self::Competence => "competence",
            Self::Utility => "utility",
            Self::Viability => "viability",
        }
    }

    /// Position in enumeration order.
    pub const fn index(self) -> usize {
        match self {
            Self::Enjoyment => 0,
            Self::Competence => 1,
            Self::Utility => 2,
            Self::Viability => 3,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enjoyment" | "passions" | "passion" => Ok(Self::Enjoyment),
            "competence" | "talents" | "talent" => Ok(Self::Competence),
            "utility" | "utilite" | "utilité" => Ok(Self::Utility),
            "viability" | "viabilite" | "viabilité" => Ok(Self::Viability),
            other => Err(DomainError::InvalidAxis(other.to_string())),
        }
    }
}

/// A value for each of the four axes.
///
/// Serialized as an object with one field per axis. Legacy French field
/// names are accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerAxis<T> {
    #[serde(alias = "passions")]
    pub enjoyment: T,
    #[serde(alias = "talents")]
    pub competence: T,
    #[serde(alias = "utilite")]
    pub utility: T,
    #[serde(alias = "viabilite")]
    pub viability: T,
}

impl<T> PerAxis<T> {
    /// Build from a function evaluated once per axis, in enumeration order.
    pub fn from_fn(mut f: impl FnMut(Axis) -> T) -> Self {
        Self {
            enjoyment: f(Axis::Enjoyment),
            competence: f(Axis::Competence),
            utility: f(Axis::Utility),
            viability: f(Axis::Viability),
        }
    }

    pub const fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::Enjoyment => &self.enjoyment,
            Axis::Competence => &self.competence,
            Axis::Utility => &self.utility,
            Axis::Viability => &self.viability,
        }
    }

    pub fn get_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::Enjoyment => &mut self.enjoyment,
            Axis::Competence => &mut self.competence,
            Axis::Utility => &mut self.utility,
            Axis::Viability => &mut self.viability,
        }
    }

    /// Iterate `(axis, value)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &T)> {
        Axis::ALL.into_iter().map(move |axis| (axis, self.get(axis)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Axis, &T) -> U) -> PerAxis<U> {
        PerAxis::from_fn(|axis| f(axis, self.get(axis)))
    }
}

impl PerAxis<f64> {
    /// Build from values given in enumeration order.
    pub const fn new(enjoyment: f64, competence: f64, utility: f64, viability: f64) -> Self {
        Self {
            enjoyment,
            competence,
            utility,
            viability,
        }
    }

    pub fn sum(&self) -> f64 {
        self.enjoyment + self.competence + self.utility + self.viability
    }

    /// Smallest value and its axis; the first axis in enumeration order wins ties.
    pub fn min_entry(&self) -> (Axis, f64) {
        self.iter()
            .fold((Axis::Enjoyment, f64::INFINITY), |best, (axis, &v)| {
                if v < best.1 {
                    (axis, v)
                } else {
                    best
                }
            })
    }

    /// Largest value and its axis; the first axis in enumeration order wins ties.
    pub fn max_entry(&self) -> (Axis, f64) {
        self.iter()
            .fold((Axis::Enjoyment, f64::NEG_INFINITY), |best, (axis, &v)| {
                if v > best.1 {
                    (axis, v)
                } else {
                    best
                }
            })
    }

    pub fn spread(&self) -> f64 {
        self.max_entry().1 - self.min_entry().1
    }
}
