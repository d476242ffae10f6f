//! Convergence detection command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::select_backend;
use crate::cli::input::{open_session, parse_weights, read_document};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{ComputeMode, Config, DetectionResult, KeywordSet};

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// JSON file mapping each axis to its keywords
    pub keywords: PathBuf,

    /// Weights (inline JSON or file); the stored profile when omitted
    #[arg(short, long)]
    pub weights: Option<String>,

    /// Boost tags, comma-separated; replaces the configured list
    #[arg(short, long, value_delimiter = ',')]
    pub boost: Vec<String>,

    /// Ignore boost tags
    #[arg(long)]
    pub no_boost: bool,

    /// Maximum number of convergences to show
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Compute on the background worker
    #[arg(long)]
    pub offload: bool,
}

#[derive(Debug, Serialize)]
pub struct DetectOutput {
    pub backend: &'static str,
    #[serde(flatten)]
    pub detection: DetectionResult,
}

impl CommandOutput for DetectOutput {
    fn to_human(&self) -> String {
        if self.detection.convergences.is_empty() {
            return "No convergences found.".to_string();
        }
        format!(
            "{}\nSweet spot score: {:.3} ({} of {} convergence(s) shown)",
            TableFormatter::new().format_convergences(&self.detection),
            self.detection.score,
            self.detection.convergences.len(),
            self.detection.total
        )
    }
}

pub async fn execute(args: DetectArgs, config: &Config, json: bool) -> Result<()> {
    let keywords: KeywordSet = read_document(&args.keywords)?;

    let mut session = open_session(config);
    session.set_keywords(keywords);
    if !args.boost.is_empty() {
        session.set_boost_tags(args.boost);
    }

    let mut request = session.request(ComputeMode::Convergences);
    if let Some(source) = args.weights {
        request.weights = parse_weights(&source)?;
    }
    request.boost_enabled &= config.engine.boost_enabled && !args.no_boost;
    if let Some(top_k) = args.top_k {
        request.top_k = top_k;
    }

    let backend = select_backend(config, args.offload).await;
    let response = backend
        .compute(request)
        .await
        .context("Computation was superseded before it finished")?;

    output(
        &DetectOutput {
            backend: backend.name(),
            detection: response.detection,
        },
        json,
    );
    Ok(())
}
