//! Weight vector and the business constraints every vector satisfies.

use serde::{Deserialize, Serialize};

use super::axis::{Axis, PerAxis};

/// Maximum spread allowed between the largest and smallest axis.
pub const GAP: f64 = 0.4;

/// Hard minimum on the Viability axis.
pub const VIAB_FLOOR: f64 = 0.15;

/// Decimal places kept by the interactive solver (1e-6).
pub const SOLVER_DECIMALS: i32 = 6;

/// Decimal places kept by the quiz aggregator.
pub const AGGREGATE_DECIMALS: i32 = 2;

/// Value every axis starts at when nothing is known about the profile.
pub const NEUTRAL_WEIGHT: f64 = 0.5;

const SPREAD_TOLERANCE: f64 = 1e-9;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Coerce a possibly-invalid number into `[axis floor, 1]`.
///
/// Non-finite input maps to the axis floor.
pub fn sanitize_axis_value(axis: Axis, value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(axis.floor(), 1.0)
    } else {
        axis.floor()
    }
}

/// Profile emphasis across the four axes.
///
/// Always satisfies `spread <= GAP` and `viability >= VIAB_FLOOR`. The only
/// ways to obtain one are the constraint-enforcing constructors here, the
/// axis solver, and the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PerAxis<f64>", into = "PerAxis<f64>")]
pub struct WeightVector {
    values: PerAxis<f64>,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self {
            values: PerAxis::from_fn(|_| NEUTRAL_WEIGHT),
        }
    }
}

impl WeightVector {
    /// Build a vector from arbitrary values, enforcing every invariant.
    ///
    /// Values are sanitized, pulled into the spread bound by a global
    /// rescale, and rounded to solver precision.
    pub fn from_values(values: PerAxis<f64>) -> Self {
        let sanitized = values.map(|axis, &v| sanitize_axis_value(axis, v));
        let constrained = enforce_global_constraints(sanitized);
        Self::from_constrained(finalize(constrained, SOLVER_DECIMALS))
    }

    /// Wrap values the caller has already brought into the constraints.
    pub(crate) fn from_constrained(values: PerAxis<f64>) -> Self {
        debug_assert!(satisfies_constraints(&values, 1e-6));
        Self { values }
    }

    pub const fn get(&self, axis: Axis) -> f64 {
        *self.values.get(axis)
    }

    pub const fn values(&self) -> &PerAxis<f64> {
        &self.values
    }

    pub fn sum(&self) -> f64 {
        self.values.sum()
    }

    pub fn spread(&self) -> f64 {
        self.values.spread()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        self.values.iter().map(|(axis, &v)| (axis, v))
    }
}

impl From<PerAxis<f64>> for WeightVector {
    fn from(values: PerAxis<f64>) -> Self {
        Self::from_values(values)
    }
}

impl From<WeightVector> for PerAxis<f64> {
    fn from(weights: WeightVector) -> Self {
        weights.values
    }
}

/// Whether `values` satisfy the spread bound and every floor within `eps`.
pub fn satisfies_constraints(values: &PerAxis<f64>, eps: f64) -> bool {
    values.spread() <= GAP + eps
        && values
            .iter()
            .all(|(axis, &v)| v >= axis.floor() - eps && v <= 1.0 + eps)
}

fn apply_viability_floor(values: &mut PerAxis<f64>) {
    if values.viability < VIAB_FLOOR {
        values.viability = VIAB_FLOOR;
    }
}

/// Pull every axis toward the mean so the spread becomes exactly `GAP`.
///
/// Returns the values untouched when the spread is already within bounds.
pub fn rescale_to_gap(values: &PerAxis<f64>) -> PerAxis<f64> {
    let spread = values.spread();
    if spread <= GAP {
        return values.clone();
    }
    let avg = values.sum() / 4.0;
    let k = GAP / spread;
    values.map(|_, &v| avg + (v - avg) * k)
}

/// Apply the Viability floor and the spread bound to freshly computed axes.
///
/// Runs floor, rescale, floor. A second rescale-and-floor round is allowed
/// when the final floor reopened the spread; it is bounded to one extra pass.
pub fn enforce_global_constraints(values: PerAxis<f64>) -> PerAxis<f64> {
    let mut out = values;
    for _ in 0..2 {
        apply_viability_floor(&mut out);
        out = rescale_to_gap(&out);
        apply_viability_floor(&mut out);
        if out.spread() <= GAP + SPREAD_TOLERANCE {
            break;
        }
    }
    out
}

/// Round to `decimals` and absorb any spread the rounding reintroduced.
///
/// When rounding pushes the spread past `GAP`, every axis above `min + GAP`
/// is lowered to it, which stays on the same decimal grid.
pub fn finalize(values: PerAxis<f64>, decimals: i32) -> PerAxis<f64> {
    let out = values.map(|_, &v| round_to(v, decimals));
    if out.spread() <= GAP + SPREAD_TOLERANCE {
        return out;
    }
    let (_, min) = out.min_entry();
    let ceiling = round_to(min + GAP, decimals);
    out.map(|_, &v| v.min(ceiling))
}
