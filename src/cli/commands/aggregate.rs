//! Quiz aggregation command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::input::{open_session, read_document};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{ChoiceRecord, Config, WeightVector};
use crate::services::ProfileAggregator;

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// JSON file holding a list of answered choices
    pub choices: PathBuf,

    /// Store the result as the current profile
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Serialize)]
pub struct AggregateOutput {
    pub weights: WeightVector,
    pub confidence_avg: f64,
    pub choices: usize,
    pub saved: bool,
}

impl CommandOutput for AggregateOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![TableFormatter::new().format_weights(&self.weights)];
        lines.push(format!(
            "Average confidence: {:.2} over {} answer(s)",
            self.confidence_avg, self.choices
        ));
        if self.saved {
            lines.push("Profile saved.".to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(args: AggregateArgs, config: &Config, json: bool) -> Result<()> {
    let choices: Vec<ChoiceRecord> = read_document(&args.choices)?;
    let profile = ProfileAggregator::new().aggregate(&choices);

    if args.save {
        open_session(config).apply_profile(&profile);
    }

    let result = AggregateOutput {
        weights: profile.weights,
        confidence_avg: profile.confidence_avg,
        choices: choices.len(),
        saved: args.save,
    };
    output(&result, json);
    Ok(())
}
