//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::aggregate::AggregateArgs;
use crate::cli::commands::detect::DetectArgs;
use crate::cli::commands::match_catalog::MatchArgs;
use crate::cli::commands::set_axis::SetAxisArgs;

#[derive(Parser, Debug)]
#[command(name = "sweetspot")]
#[command(about = "Sweetspot - profile weighting, convergence detection and catalog matching", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Config file to use instead of .sweetspot/config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate quiz answers into a weight profile
    Aggregate(AggregateArgs),

    /// Move one axis slider, keeping the profile within bounds
    SetAxis(SetAxisArgs),

    /// Detect keywords shared across axes and score the sweet spot
    Detect(DetectArgs),

    /// Rank catalog items against the profile
    Match(MatchArgs),

    /// Run the offload worker over stdin/stdout
    Worker,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Axis;

    #[test]
    fn test_parse_set_axis() {
        let cli = Cli::try_parse_from([
            "sweetspot", "set-axis", "--axis", "passions", "--value", "0.8", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        let Commands::SetAxis(args) = cli.command else {
            panic!("expected set-axis");
        };
        assert_eq!(args.axis, Axis::Enjoyment);
        assert_eq!(args.value, 0.8);
        assert!(args.weights.is_none());
    }

    #[test]
    fn test_parse_detect_options() {
        let cli = Cli::try_parse_from([
            "sweetspot",
            "--config",
            "custom.yaml",
            "detect",
            "keywords.json",
            "--boost",
            "design,code",
            "-k",
            "5",
            "--offload",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        let Commands::Detect(args) = cli.command else {
            panic!("expected detect");
        };
        assert_eq!(args.boost, vec!["design", "code"]);
        assert_eq!(args.top_k, Some(5));
        assert!(args.offload);
        assert!(!args.no_boost);
    }

    #[test]
    fn test_match_rejects_weights_with_choices() {
        let result = Cli::try_parse_from([
            "sweetspot",
            "match",
            "catalog.json",
            "--weights",
            "w.json",
            "--choices",
            "c.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_axis_is_rejected() {
        let result =
            Cli::try_parse_from(["sweetspot", "set-axis", "--axis", "luck", "--value", "0.5"]);
        assert!(result.is_err());
    }
}
