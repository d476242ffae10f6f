//! Catalog ranking command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::select_backend;
use crate::cli::input::{open_session, parse_weights, read_document};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{
    AggregatedProfile, CatalogItem, ChoiceRecord, ComputeMode, Config, RankedItem,
};

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// JSON file holding a list of catalog items
    pub catalog: PathBuf,

    /// Profile weights (inline JSON or file); the stored profile when omitted
    #[arg(short, long, conflicts_with = "choices")]
    pub weights: Option<String>,

    /// Answered choices to aggregate into the profile first
    #[arg(long)]
    pub choices: Option<PathBuf>,

    /// Maximum number of items to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Compute on the background worker
    #[arg(long)]
    pub offload: bool,
}

#[derive(Debug, Serialize)]
pub struct MatchOutput {
    pub backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<AggregatedProfile>,
    pub ranking: Vec<RankedItem>,
}

impl CommandOutput for MatchOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = Vec::new();
        if let Some(profile) = &self.profile {
            lines.push(formatter.format_weights(&profile.weights));
        }
        if self.ranking.is_empty() {
            lines.push("No catalog items to rank.".to_string());
        } else {
            lines.push(formatter.format_ranking(&self.ranking));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: MatchArgs, config: &Config, json: bool) -> Result<()> {
    let catalog: Vec<CatalogItem> = read_document(&args.catalog)?;

    let mut request = open_session(config).request(ComputeMode::Full);
    if let Some(source) = args.weights {
        request.weights = parse_weights(&source)?;
    }
    if let Some(path) = args.choices {
        request.choices = read_document::<Vec<ChoiceRecord>>(&path)?;
    }
    request.catalog = catalog;
    request.limit = args.limit;

    let backend = select_backend(config, args.offload).await;
    let response = backend
        .compute(request)
        .await
        .context("Computation was superseded before it finished")?;

    output(
        &MatchOutput {
            backend: backend.name(),
            profile: response.profile,
            ranking: response.ranking,
        },
        json,
    );
    Ok(())
}
