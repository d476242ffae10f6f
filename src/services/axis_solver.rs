use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::models::weights::{
    enforce_global_constraints, finalize, round_to, SOLVER_DECIMALS,
};
use crate::domain::models::{Axis, PerAxis, WeightVector, GAP};

const SPREAD_TOLERANCE: f64 = 1e-9;

/// Why an axis value differs from what was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjustmentKind {
    /// Requested value fell outside `[floor, 1]` or the window left by the other axes
    Clamp,
    /// Requested Viability fell below its floor
    ViabilityFloor,
    /// Another axis moved to restore the spread bound
    GapCorrection,
}

/// Observational record of one adjustment, for UI feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRecord {
    pub kind: AdjustmentKind,
    pub axis: Axis,
    pub before: f64,
    pub after: f64,
}

/// Result of a constrained axis edit.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub weights: WeightVector,
    pub adjustments: Vec<AdjustmentRecord>,
}

/// Enforces the bounded-spread invariant on single-axis edits.
///
/// Only the edited axis and, when required, one opposite-extreme axis change.
/// The edit completes in a single pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisConstraintSolver;

impl AxisConstraintSolver {
    pub const fn new() -> Self {
        Self
    }

    /// Set `axis` to `raw_value`, keeping every weight vector invariant.
    pub fn set_axis(&self, current: &WeightVector, axis: Axis, raw_value: f64) -> SolverOutcome {
        let (values, adjustments) = solve(current.values(), axis, raw_value);

        debug!(
            axis = %axis,
            requested = raw_value,
            applied = values.get(axis),
            adjustments = adjustments.len(),
            "axis updated"
        );

        SolverOutcome {
            weights: WeightVector::from_constrained(values),
            adjustments,
        }
    }
}

fn record(kind: AdjustmentKind, axis: Axis, before: f64, after: f64) -> AdjustmentRecord {
    AdjustmentRecord {
        kind,
        axis,
        before,
        after,
    }
}

/// Extreme values among the axes other than `axis`, as `(min, max)`.
fn other_bounds(values: &PerAxis<f64>, axis: Axis) -> (f64, f64) {
    values
        .iter()
        .filter(|(a, _)| *a != axis)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, &v)| {
            (lo.min(v), hi.max(v))
        })
}

/// Axis holding the smallest (or largest) value other than `skip`.
/// Ties resolve to the earliest axis in enumeration order.
fn extreme_excluding(values: &PerAxis<f64>, skip: Axis, want_max: bool) -> Axis {
    let mut best: Option<(Axis, f64)> = None;
    for (axis, &v) in values.iter().filter(|(a, _)| *a != skip) {
        let better = match best {
            None => true,
            Some((_, b)) if want_max => v > b,
            Some((_, b)) => v < b,
        };
        if better {
            best = Some((axis, v));
        }
    }
    best.map_or(skip, |(axis, _)| axis)
}

pub(crate) fn solve(
    current: &PerAxis<f64>,
    axis: Axis,
    raw_value: f64,
) -> (PerAxis<f64>, Vec<AdjustmentRecord>) {
    let mut adjustments = Vec::new();
    let floor = axis.floor();
    let previous = *current.get(axis);

    let requested = if raw_value.is_finite() { raw_value } else { floor };
    let mut value = requested.clamp(floor, 1.0);
    if value != requested {
        let kind = if axis == Axis::Viability && requested < floor {
            AdjustmentKind::ViabilityFloor
        } else {
            AdjustmentKind::Clamp
        };
        adjustments.push(record(kind, axis, requested, value));
    }

    // Window left open by the other three axes. Empty only when they
    // already violate the spread bound among themselves.
    let (min_other, max_other) = other_bounds(current, axis);
    let allowed_min = (max_other - GAP).max(floor);
    let allowed_max = (min_other + GAP).min(1.0);
    if allowed_min <= allowed_max {
        let windowed = value.clamp(allowed_min, allowed_max);
        if windowed != value {
            adjustments.push(record(AdjustmentKind::Clamp, axis, value, windowed));
            value = windowed;
        }
    }

    let mut next = current.map(|_, &v| round_to(v, SOLVER_DECIMALS));
    *next.get_mut(axis) = round_to(value, SOLVER_DECIMALS);

    if next.spread() > GAP + SPREAD_TOLERANCE {
        let (target, corrected) = if value > previous {
            let (_, global_max) = next.max_entry();
            let target = extreme_excluding(&next, axis, false);
            let raised = (global_max - GAP).max(target.floor()).max(*next.get(target));
            (target, raised)
        } else {
            let (_, global_min) = next.min_entry();
            let target = extreme_excluding(&next, axis, true);
            let lowered = (global_min + GAP).min(1.0).min(*next.get(target));
            (target, lowered)
        };
        let corrected = round_to(corrected, SOLVER_DECIMALS);
        adjustments.push(record(
            AdjustmentKind::GapCorrection,
            target,
            *next.get(target),
            corrected,
        ));
        *next.get_mut(target) = corrected;

        // One corrective move cannot repair a vector whose untouched axes
        // were already out of bounds; fall back to the global rescale.
        if next.spread() > GAP + SPREAD_TOLERANCE {
            let before = next.clone();
            next = enforce_global_constraints(before.clone());
            for (a, &v) in next.iter() {
                let old = *before.get(a);
                if (old - v).abs() > SPREAD_TOLERANCE {
                    adjustments.push(record(AdjustmentKind::GapCorrection, a, old, v));
                }
            }
        }
    }

    (finalize(next, SOLVER_DECIMALS), adjustments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::weights::satisfies_constraints;
    use crate::domain::models::VIAB_FLOOR;

    const EPS: f64 = 1e-6;

    fn weights(e: f64, c: f64, u: f64, v: f64) -> WeightVector {
        WeightVector::from_values(PerAxis::new(e, c, u, v))
    }

    #[test]
    fn test_set_within_window_changes_only_that_axis() {
        let solver = AxisConstraintSolver::new();
        let out = solver.set_axis(&WeightVector::default(), Axis::Utility, 0.7);
        assert_eq!(out.weights.values(), &PerAxis::new(0.5, 0.5, 0.7, 0.5));
        assert!(out.adjustments.is_empty());
    }

    #[test]
    fn test_window_clamps_raise_from_neutral() {
        // Other axes sit at 0.5, so the window for Enjoyment is [0.1, 0.9].
        let solver = AxisConstraintSolver::new();
        let out = solver.set_axis(&WeightVector::default(), Axis::Enjoyment, 1.0);
        assert!((out.weights.get(Axis::Enjoyment) - 0.9).abs() < EPS);
        assert!(out.weights.spread() <= GAP + EPS);
        assert_eq!(out.weights.get(Axis::Competence), 0.5);
        assert_eq!(
            out.adjustments,
            vec![AdjustmentRecord {
                kind: AdjustmentKind::Clamp,
                axis: Axis::Enjoyment,
                before: 1.0,
                after: 0.9,
            }]
        );
    }

    #[test]
    fn test_viability_floor_record() {
        let solver = AxisConstraintSolver::new();
        let current = weights(0.3, 0.3, 0.3, 0.3);
        let out = solver.set_axis(&current, Axis::Viability, 0.0);
        assert_eq!(out.weights.get(Axis::Viability), VIAB_FLOOR);
        assert_eq!(out.adjustments[0].kind, AdjustmentKind::ViabilityFloor);
    }

    #[test]
    fn test_non_finite_input_goes_to_floor() {
        let solver = AxisConstraintSolver::new();
        let current = weights(0.3, 0.3, 0.3, 0.3);
        let out = solver.set_axis(&current, Axis::Competence, f64::NAN);
        assert_eq!(out.weights.get(Axis::Competence), 0.0);
        assert!(satisfies_constraints(out.weights.values(), EPS));
    }

    #[test]
    fn test_extremes_pushed_further_converge_in_one_pass() {
        let solver = AxisConstraintSolver::new();
        let current = weights(0.9, 0.5, 0.5, 0.5);
        assert!((current.spread() - GAP).abs() < EPS);

        let up = solver.set_axis(&current, Axis::Enjoyment, 1.0);
        assert!(up.weights.spread() <= GAP + EPS);
        assert!((up.weights.get(Axis::Enjoyment) - 0.9).abs() < EPS);

        let down = solver.set_axis(&current, Axis::Competence, 0.2);
        assert!(down.weights.spread() <= GAP + EPS);
        assert!((down.weights.get(Axis::Competence) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_gap_correction_raises_global_minimum() {
        // Untouched axes span 0.45, so a raise must lift the lowest one.
        let current = PerAxis::new(0.5, 0.9, 0.45, 0.5);
        let (next, adjustments) = solve(&current, Axis::Enjoyment, 0.6);
        assert!((next.spread() - GAP).abs() < EPS);
        assert_eq!(next.utility, 0.5);
        assert_eq!(next.enjoyment, 0.6);
        let correction = adjustments
            .iter()
            .find(|a| a.kind == AdjustmentKind::GapCorrection)
            .unwrap();
        assert_eq!(correction.axis, Axis::Utility);
        assert_eq!(correction.before, 0.45);
    }

    #[test]
    fn test_gap_correction_lowers_global_maximum() {
        let current = PerAxis::new(0.7, 0.9, 0.45, 0.6);
        let (next, adjustments) = solve(&current, Axis::Enjoyment, 0.55);
        assert!((next.spread() - GAP).abs() < EPS);
        assert!((next.competence - 0.85).abs() < EPS);
        assert_eq!(adjustments.last().unwrap().axis, Axis::Competence);
    }

    #[test]
    fn test_broken_vector_is_repaired() {
        let current = PerAxis::new(0.5, 1.0, 0.0, 0.5);
        let (next, _) = solve(&current, Axis::Viability, 0.5);
        assert!(satisfies_constraints(&next, EPS));
    }

    #[test]
    fn test_idempotent_on_current_value() {
        let solver = AxisConstraintSolver::new();
        let current = weights(0.62, 0.41, 0.8, 0.55);
        for axis in Axis::ALL {
            let out = solver.set_axis(&current, axis, current.get(axis));
            assert_eq!(out.weights, current);
            assert!(out.adjustments.is_empty());
        }
    }
}
