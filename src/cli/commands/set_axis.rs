//! Single slider edit through the constraint solver.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::input::{open_session, parse_weights};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Axis, Config, WeightVector};
use crate::services::{AdjustmentRecord, AxisConstraintSolver};

#[derive(Args, Debug)]
pub struct SetAxisArgs {
    /// Starting weights (inline JSON or file); the stored profile when omitted
    #[arg(short, long)]
    pub weights: Option<String>,

    /// Axis to move (enjoyment, competence, utility, viability)
    #[arg(short, long)]
    pub axis: Axis,

    /// Requested value in [0, 1]
    #[arg(short, long, allow_hyphen_values = true)]
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct SetAxisOutput {
    pub weights: WeightVector,
    pub adjustments: Vec<AdjustmentRecord>,
    pub persisted: bool,
}

impl CommandOutput for SetAxisOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = vec![formatter.format_weights(&self.weights)];
        if !self.adjustments.is_empty() {
            lines.push(formatter.format_adjustments(&self.adjustments));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: SetAxisArgs, config: &Config, json: bool) -> Result<()> {
    let result = match args.weights {
        Some(source) => {
            let current = parse_weights(&source)?;
            let outcome = AxisConstraintSolver::new().set_axis(&current, args.axis, args.value);
            SetAxisOutput {
                weights: outcome.weights,
                adjustments: outcome.adjustments,
                persisted: false,
            }
        }
        None => {
            let mut session = open_session(config);
            let outcome = session.set_axis(args.axis, args.value);
            SetAxisOutput {
                weights: outcome.weights,
                adjustments: outcome.adjustments,
                persisted: true,
            }
        }
    };

    output(&result, json);
    Ok(())
}
