//! Sweetspot CLI entry point.

use anyhow::Result;
use clap::Parser;

use sweetspot::cli::commands::{aggregate, detect, match_catalog, set_axis, worker};
use sweetspot::cli::{handle_error, Cli, Commands};
use sweetspot::infrastructure::config::ConfigLoader;
use sweetspot::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    match cli.command {
        Commands::Aggregate(args) => aggregate::execute(args, &config, cli.json).await,
        Commands::SetAxis(args) => set_axis::execute(args, &config, cli.json).await,
        Commands::Detect(args) => detect::execute(args, &config, cli.json).await,
        Commands::Match(args) => match_catalog::execute(args, &config, cli.json).await,
        Commands::Worker => worker::execute(&config).await,
    }
}
